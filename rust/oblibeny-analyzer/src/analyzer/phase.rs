//! Phase classification — flags compile-only constructs reachable from
//! deploy code.
//!
//! The compile-only construct set is passed-in configuration rather than a
//! hidden global, so the classifier can be exercised against alternative
//! language profiles in isolation. The classifier never rejects a program:
//! its verdict is sound iff the violation list is empty.

use crate::analyzer::report::Diagnostic;
use crate::analyzer::symbols::SymbolTable;
use crate::analyzer::visit::children;
use oblibeny_core::{ConstructKind, Expr, Program, SourceLoc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which construct tags are legal only at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub compile_only: BTreeSet<ConstructKind>,
}

impl PhaseConfig {
    pub fn is_compile_only(&self, kind: ConstructKind) -> bool {
        self.compile_only.contains(&kind)
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            compile_only: BTreeSet::from([
                ConstructKind::DefunCompile,
                ConstructKind::Macro,
                ConstructKind::EvalCompile,
                ConstructKind::Include,
                ConstructKind::For,
                ConstructKind::While,
            ]),
        }
    }
}

/// Scan every deploy function for compile-only constructs.
///
/// At most one violation is recorded per function (the first in source
/// order); scanning always continues with the remaining functions.
pub fn classify(program: &Program, symbols: &SymbolTable, config: &PhaseConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (name, body, _) in program.deploy_functions() {
        if let Some((loc, construct)) = body.iter().find_map(|e| first_violation(e, symbols, config))
        {
            diagnostics.push(Diagnostic::phase_violation(name, loc, &construct));
        }
    }
    diagnostics
}

/// First compile-only subexpression in preorder, if any.
fn first_violation(
    expr: &Expr,
    symbols: &SymbolTable,
    config: &PhaseConfig,
) -> Option<(SourceLoc, String)> {
    if config.is_compile_only(expr.kind()) {
        return Some((expr.loc(), format!("'{}' form", expr.kind())));
    }
    if let Expr::Call { callee, .. } = expr {
        if let Expr::Ident(name, _) = callee.as_ref() {
            if symbols.is_compile_time(name) {
                return Some((expr.loc(), format!("call to compile-time function '{}'", name)));
            }
        }
    }
    children(expr)
        .into_iter()
        .find_map(|child| first_violation(child, symbols, config))
}
