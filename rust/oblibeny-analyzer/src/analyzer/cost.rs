//! Worst-case execution cost and memory estimation.
//!
//! Runs after cycle detection: functions are processed callees-first so a
//! caller's cost incorporates already-computed callee costs. Every figure
//! is a worst case — `if` takes the more expensive arm, loops multiply the
//! body by the folded iteration count. Memory mirrors the structure but
//! sums declared array/binding sizes within a scope and counts a loop body
//! once (per-iteration locals are transient, stack-only allocation).
//!
//! Cost is *absent*, never defaulted, when it cannot be meaningful: for
//! members of a call cycle, for bodies with unresolvable loop bounds,
//! compile-only constructs, or unresolved callees, and transitively for
//! their callers. Arithmetic saturates so adversarial inputs cannot panic
//! the estimator.

use crate::analyzer::call_graph::CallGraph;
use crate::analyzer::cycles::CycleAnalysis;
use crate::analyzer::fold;
use crate::analyzer::report::Diagnostic;
use crate::analyzer::symbols::SymbolTable;
use oblibeny_core::{Expr, Parameter, Program, ResourceBudget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Cost table ──────────────────────────────────────────────────────

/// Per-operation cost constants, in abstract time units and bytes.
///
/// Division and capability-gated I/O are priced far above plain arithmetic
/// to reflect real hardware cost. All fields are serde-defaulted so a TOML
/// override file may name only the constants it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    /// Literal or variable reference.
    pub unit: u64,
    pub add: u64,
    pub sub: u64,
    pub mul: u64,
    pub div: u64,
    pub modulo: u64,
    pub compare: u64,
    pub logic: u64,
    pub array_access: u64,
    pub gpio: u64,
    pub uart: u64,
    pub sensor: u64,
    pub network: u64,
    pub timestamp: u64,
    /// Fixed overhead added to each deploy-function call.
    pub call_overhead: u64,
    /// Fixed overhead per `let` binding or `set`.
    pub binding_overhead: u64,
    /// Time charged for a sleep whose duration does not fold.
    pub sleep_default_units: u64,
    /// Stack bytes per call frame.
    pub frame_bytes: u64,
    /// Stack bytes per local binding slot.
    pub slot_bytes: u64,
    /// Network bytes assumed for a payload of unknown size.
    pub network_payload_bytes: u64,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            unit: 1,
            add: 1,
            sub: 1,
            mul: 2,
            div: 10,
            modulo: 10,
            compare: 1,
            logic: 1,
            array_access: 1,
            gpio: 100,
            uart: 200,
            sensor: 500,
            network: 1000,
            timestamp: 1,
            call_overhead: 10,
            binding_overhead: 1,
            sleep_default_units: 1000,
            frame_bytes: 32,
            slot_bytes: 8,
            network_payload_bytes: 256,
        }
    }
}

impl CostTable {
    /// Time cost of a built-in operator application, if `name` is one.
    pub fn op_cost(&self, name: &str) -> Option<u64> {
        match name {
            "+" => Some(self.add),
            "-" => Some(self.sub),
            "*" => Some(self.mul),
            "/" => Some(self.div),
            "mod" => Some(self.modulo),
            "<" | "<=" | ">" | ">=" | "=" | "!=" => Some(self.compare),
            "and" | "or" | "not" => Some(self.logic),
            _ => None,
        }
    }

    /// True for names that are built-in primitives rather than functions.
    pub fn is_primitive(&self, name: &str) -> bool {
        self.op_cost(name).is_some()
    }
}

// ── Per-function cost ───────────────────────────────────────────────

/// Worst-case figures for one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionCost {
    pub wcet: u64,
    pub memory: u64,
    pub network: u64,
}

impl FunctionCost {
    fn zero() -> Self {
        Self::default()
    }

    fn time(units: u64) -> Self {
        Self { wcet: units, memory: 0, network: 0 }
    }

    fn plus(self, other: FunctionCost) -> Self {
        Self {
            wcet: self.wcet.saturating_add(other.wcet),
            memory: self.memory.saturating_add(other.memory),
            network: self.network.saturating_add(other.network),
        }
    }
}

/// Cost profiles keyed by function name (`None` = cost undefined), plus
/// the budget diagnostics found while checking them.
#[derive(Debug)]
pub struct CostEstimate {
    pub profiles: BTreeMap<String, Option<FunctionCost>>,
    pub diagnostics: Vec<Diagnostic>,
}

struct Estimator<'a> {
    table: &'a CostTable,
    symbols: &'a SymbolTable,
    profiles: BTreeMap<String, Option<FunctionCost>>,
}

/// Estimate every deploy function and check the reachable set against the
/// declared budget. All functions are fully evaluated regardless of how
/// many violations are found.
pub fn estimate(
    program: &Program,
    graph: &CallGraph,
    cycles: &CycleAnalysis,
    symbols: &SymbolTable,
    table: &CostTable,
    budget: &ResourceBudget,
    entry: Option<&str>,
) -> CostEstimate {
    let mut defs: BTreeMap<&str, (&[Parameter], &[Expr])> = BTreeMap::new();
    for form in &program.forms {
        if let Expr::DefunDeploy { name, params, body, .. } = form {
            defs.insert(name.as_str(), (params.as_slice(), body.as_slice()));
        }
    }

    let mut estimator = Estimator { table, symbols, profiles: BTreeMap::new() };

    for &id in cycles.bottom_up() {
        let name = graph.name(id);
        let profile = if cycles.is_cyclic(id) {
            None
        } else {
            defs.get(name).and_then(|&(params, body)| {
                estimator.body_cost(body).map(|cost| {
                    // Parameters occupy the frame alongside locals.
                    let param_bytes = params
                        .iter()
                        .fold(0u64, |acc, p| acc.saturating_add(p.byte_size()));
                    cost.plus(FunctionCost { wcet: 0, memory: param_bytes, network: 0 })
                })
            })
        };
        estimator.profiles.insert(name.to_string(), profile);
    }

    let mut diagnostics = Vec::new();
    let checked: Vec<_> = match entry.and_then(|e| graph.id(e)) {
        Some(start) => graph.reachable_from(start),
        None => graph.ids().collect(),
    };
    for id in checked {
        let name = graph.name(id);
        let Some(Some(cost)) = estimator.profiles.get(name) else {
            continue;
        };
        if cost.wcet > budget.time_units {
            diagnostics.push(Diagnostic::budget_exceeded(
                name,
                "time",
                cost.wcet,
                budget.time_units,
            ));
        }
        if cost.memory > budget.memory_bytes {
            diagnostics.push(Diagnostic::budget_exceeded(
                name,
                "memory",
                cost.memory,
                budget.memory_bytes,
            ));
        }
        if cost.network > budget.network_bytes {
            diagnostics.push(Diagnostic::budget_exceeded(
                name,
                "network",
                cost.network,
                budget.network_bytes,
            ));
        }
    }

    CostEstimate { profiles: estimator.profiles, diagnostics }
}

impl Estimator<'_> {
    fn body_cost(&self, body: &[Expr]) -> Option<FunctionCost> {
        let mut total = FunctionCost::zero();
        for expr in body {
            total = total.plus(self.expr_cost(expr)?);
        }
        Some(total)
    }

    fn expr_cost(&self, expr: &Expr) -> Option<FunctionCost> {
        let t = self.table;
        match expr {
            Expr::IntLit(..) | Expr::FloatLit(..) | Expr::BoolLit(..) | Expr::Ident(..) => {
                Some(FunctionCost::time(t.unit))
            }
            Expr::StringLit(s, _) => Some(FunctionCost {
                wcet: t.unit,
                memory: s.len() as u64,
                network: 0,
            }),

            Expr::Call { callee, args, .. } => {
                let mut total = FunctionCost::zero();
                for arg in args {
                    total = total.plus(self.expr_cost(arg)?);
                }
                let Expr::Ident(name, _) = callee.as_ref() else {
                    return None;
                };
                if let Some(op) = t.op_cost(name) {
                    return Some(total.plus(FunctionCost::time(op)));
                }
                if self.symbols.is_deploy(name) {
                    let callee_cost = self.profiles.get(name).copied().flatten()?;
                    return Some(total.plus(callee_cost).plus(FunctionCost {
                        wcet: t.call_overhead,
                        memory: t.frame_bytes,
                        network: 0,
                    }));
                }
                // Compile-time or unresolved target: flagged elsewhere,
                // and there is no meaningful deploy-time cost for it.
                None
            }

            Expr::If { condition, then_branch, else_branch, .. } => {
                let cond = self.expr_cost(condition)?;
                let then_cost = self.expr_cost(then_branch)?;
                let else_cost = self.expr_cost(else_branch)?;
                Some(FunctionCost {
                    wcet: cond.wcet.saturating_add(then_cost.wcet.max(else_cost.wcet)),
                    memory: cond
                        .memory
                        .saturating_add(then_cost.memory)
                        .saturating_add(else_cost.memory),
                    network: cond
                        .network
                        .saturating_add(then_cost.network.max(else_cost.network)),
                })
            }

            Expr::BoundedFor { start, end, body, .. } => {
                let s = fold::fold_int(start)?;
                let e = fold::fold_int(end)?;
                let iterations = e.saturating_sub(s).max(0) as u64;
                let bounds = self.expr_cost(start)?.plus(self.expr_cost(end)?);
                let per_iter = self.body_cost(body)?;
                Some(FunctionCost {
                    wcet: bounds.wcet.saturating_add(per_iter.wcet.saturating_mul(iterations)),
                    // Loop locals are reused each iteration: counted once.
                    memory: bounds.memory.saturating_add(per_iter.memory),
                    network: bounds
                        .network
                        .saturating_add(per_iter.network.saturating_mul(iterations)),
                })
            }

            Expr::Let { bindings, body, .. } => {
                let mut total = FunctionCost::zero();
                for (_, value) in bindings {
                    total = total.plus(self.expr_cost(value)?).plus(FunctionCost {
                        wcet: t.binding_overhead,
                        memory: t.slot_bytes,
                        network: 0,
                    });
                }
                Some(total.plus(self.body_cost(body)?))
            }
            Expr::Set { value, .. } => Some(
                self.expr_cost(value)?.plus(FunctionCost::time(t.binding_overhead)),
            ),

            Expr::WithCapability { capability, body, .. } => {
                Some(self.expr_cost(capability)?.plus(self.body_cost(body)?))
            }

            Expr::ArrayLit { elem_type, size, .. } => Some(FunctionCost {
                wcet: t.unit,
                memory: elem_type.byte_size().saturating_mul(*size as u64),
                network: 0,
            }),
            Expr::ArrayGet { array, index, .. } => Some(
                self.expr_cost(array)?
                    .plus(self.expr_cost(index)?)
                    .plus(FunctionCost::time(t.array_access)),
            ),
            Expr::ArraySet { array, index, value, .. } => Some(
                self.expr_cost(array)?
                    .plus(self.expr_cost(index)?)
                    .plus(self.expr_cost(value)?)
                    .plus(FunctionCost::time(t.array_access)),
            ),
            Expr::ArrayLength { array, .. } => {
                Some(self.expr_cost(array)?.plus(FunctionCost::time(t.array_access)))
            }

            Expr::GpioSet { device, value, .. } => Some(
                self.expr_cost(device)?
                    .plus(self.expr_cost(value)?)
                    .plus(FunctionCost::time(t.gpio)),
            ),
            Expr::GpioGet { device, .. } => {
                Some(self.expr_cost(device)?.plus(FunctionCost::time(t.gpio)))
            }
            Expr::UartSend { device, data, .. } => Some(
                self.expr_cost(device)?
                    .plus(self.expr_cost(data)?)
                    .plus(FunctionCost::time(t.uart)),
            ),
            Expr::UartRecv { device, .. } => {
                Some(self.expr_cost(device)?.plus(FunctionCost::time(t.uart)))
            }
            Expr::SensorRead { sensor, .. } => {
                Some(self.expr_cost(sensor)?.plus(FunctionCost::time(t.sensor)))
            }
            Expr::NetworkSend { device, data, .. } => Some(
                self.expr_cost(device)?.plus(self.expr_cost(data)?).plus(FunctionCost {
                    wcet: t.network,
                    memory: 0,
                    network: self.payload_bytes(data),
                }),
            ),
            Expr::NetworkRecv { device, .. } => {
                Some(self.expr_cost(device)?.plus(FunctionCost {
                    wcet: t.network,
                    memory: 0,
                    network: t.network_payload_bytes,
                }))
            }
            Expr::SleepMs { duration, .. } => {
                let slept = match fold::fold_int(duration) {
                    Some(ms) => ms.max(0) as u64,
                    None => t.sleep_default_units,
                };
                Some(self.expr_cost(duration)?.plus(FunctionCost::time(slept)))
            }
            Expr::Timestamp { .. } => Some(FunctionCost::time(t.timestamp)),

            // Declarations carry no deploy-time cost.
            Expr::Defcap { .. } | Expr::ResourceBudget { .. } => Some(FunctionCost::zero()),

            // Compile-only constructs and nested definitions have no
            // meaningful deploy-time cost; the classifier reports them.
            Expr::DefunDeploy { .. }
            | Expr::DefunCompile { .. }
            | Expr::Macro { .. }
            | Expr::EvalCompile { .. }
            | Expr::Include { .. }
            | Expr::For { .. }
            | Expr::While { .. } => None,
        }
    }

    /// Declared size of an outbound payload, falling back to the table's
    /// default when the size is not statically known.
    fn payload_bytes(&self, data: &Expr) -> u64 {
        match data {
            Expr::StringLit(s, _) => s.len() as u64,
            Expr::ArrayLit { elem_type, size, .. } => {
                elem_type.byte_size().saturating_mul(*size as u64)
            }
            _ => self.table.network_payload_bytes,
        }
    }
}
