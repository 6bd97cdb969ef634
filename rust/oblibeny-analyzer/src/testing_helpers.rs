//! Deterministic fixtures for analyzer tests.
//!
//! Expression builders keep test trees short (every node gets a dummy
//! location), and `SimpleRng` is a seeded xorshift64 generator for the
//! synthetic call-graph properties — same seed, same sequence, no
//! randomness crate.

use oblibeny_core::{Expr, Program, ResourceBudget, SourceLoc};

// ── SimpleRng — deterministic xorshift64 PRNG ───────────────────────

/// Seeded pseudo-random generator. Zero seeds are remapped to avoid the
/// degenerate all-zero state.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x0B11_BE11_5EED_CAFE } else { seed };
        SimpleRng { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Random usize in `[0, max)`; 0 when `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() as usize) % max
    }

    /// True with probability `num / denom`.
    pub fn chance(&mut self, num: u64, denom: u64) -> bool {
        denom != 0 && self.next_u64() % denom < num
    }
}

// ── Expression builders ─────────────────────────────────────────────

fn d() -> SourceLoc {
    SourceLoc::dummy()
}

pub fn int(n: i64) -> Expr {
    Expr::IntLit(n, d())
}

pub fn bool_lit(b: bool) -> Expr {
    Expr::BoolLit(b, d())
}

pub fn str_lit(s: &str) -> Expr {
    Expr::StringLit(s.to_string(), d())
}

pub fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string(), d())
}

/// Application of a named function or operator.
pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call { callee: Box::new(ident(name)), args, loc: d() }
}

/// Alias of [`call`] that reads better for operator applications.
pub fn op(name: &str, args: Vec<Expr>) -> Expr {
    call(name, args)
}

pub fn deploy(name: &str, body: Vec<Expr>) -> Expr {
    Expr::DefunDeploy {
        name: name.to_string(),
        params: vec![],
        return_type: None,
        body,
        loc: d(),
    }
}

pub fn compile_fn(name: &str, body: Vec<Expr>) -> Expr {
    Expr::DefunCompile {
        name: name.to_string(),
        params: vec![],
        return_type: None,
        body,
        loc: d(),
    }
}

pub fn bounded_for(var: &str, start: Expr, end: Expr, body: Vec<Expr>) -> Expr {
    Expr::BoundedFor {
        var: var.to_string(),
        start: Box::new(start),
        end: Box::new(end),
        body,
        loc: d(),
    }
}

pub fn while_loop(condition: Expr, body: Vec<Expr>) -> Expr {
    Expr::While { condition: Box::new(condition), body, loc: d() }
}

pub fn let_(bindings: Vec<(&str, Expr)>, body: Vec<Expr>) -> Expr {
    Expr::Let {
        bindings: bindings.into_iter().map(|(n, v)| (n.to_string(), v)).collect(),
        body,
        loc: d(),
    }
}

pub fn set(target: &str, value: Expr) -> Expr {
    Expr::Set { target: target.to_string(), value: Box::new(value), loc: d() }
}

pub fn if_(condition: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
    Expr::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
        loc: d(),
    }
}

pub fn with_capability(capability: Expr, body: Vec<Expr>) -> Expr {
    Expr::WithCapability { capability: Box::new(capability), body, loc: d() }
}

// ── Program builders ────────────────────────────────────────────────

/// Program with an unconstrained budget.
pub fn program(forms: Vec<Expr>) -> Program {
    Program::new("test-program", ResourceBudget::unlimited(), forms)
}

pub fn program_with_budget(
    forms: Vec<Expr>,
    time_units: u64,
    memory_bytes: u64,
    network_bytes: u64,
) -> Program {
    Program::new(
        "test-program",
        ResourceBudget::new(time_units, memory_bytes, network_bytes),
        forms,
    )
}
