//! Definition table for top-level functions and macros.
//!
//! Built in one pass over the program before any analysis stage runs.
//! Duplicate names abort the whole analysis: later stages resolve callees
//! by name and must never silently pick one of two candidates.

use oblibeny_core::{Expr, Program, SourceLoc};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("duplicate definition '{name}' at {loc}")]
    Duplicate { name: String, loc: SourceLoc },
}

/// What a top-level name is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Deploy,
    Compile,
    Macro,
}

/// Name → definition table, with deploy functions kept in declaration order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    defs: HashMap<String, DefKind>,
    deploy_order: Vec<String>,
}

impl SymbolTable {
    pub fn kind_of(&self, name: &str) -> Option<DefKind> {
        self.defs.get(name).copied()
    }

    pub fn is_deploy(&self, name: &str) -> bool {
        self.kind_of(name) == Some(DefKind::Deploy)
    }

    /// True for names whose application from deploy code is a phase
    /// violation rather than a call edge.
    pub fn is_compile_time(&self, name: &str) -> bool {
        matches!(self.kind_of(name), Some(DefKind::Compile) | Some(DefKind::Macro))
    }

    /// Deploy function names in declaration order.
    pub fn deploy_names(&self) -> &[String] {
        &self.deploy_order
    }
}

/// Collect all top-level definitions, failing fast on a duplicate name.
pub fn collect(program: &Program) -> Result<SymbolTable, SymbolError> {
    let mut table = SymbolTable::default();
    for form in &program.forms {
        let (name, kind, loc) = match form {
            Expr::DefunDeploy { name, loc, .. } => (name, DefKind::Deploy, *loc),
            Expr::DefunCompile { name, loc, .. } => (name, DefKind::Compile, *loc),
            Expr::Macro { name, loc, .. } => (name, DefKind::Macro, *loc),
            _ => continue,
        };
        if table.defs.contains_key(name) {
            return Err(SymbolError::Duplicate { name: name.clone(), loc });
        }
        table.defs.insert(name.clone(), kind);
        if kind == DefKind::Deploy {
            table.deploy_order.push(name.clone());
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_helpers::{compile_fn, deploy, int, program};

    #[test]
    fn test_collect_orders_deploy_functions() {
        let prog = program(vec![
            deploy("b", vec![int(1)]),
            compile_fn("gen", vec![int(2)]),
            deploy("a", vec![int(3)]),
        ]);
        let table = collect(&prog).unwrap();
        assert_eq!(table.deploy_names(), &["b".to_string(), "a".to_string()]);
        assert!(table.is_deploy("a"));
        assert!(table.is_compile_time("gen"));
        assert!(!table.is_deploy("gen"));
        assert_eq!(table.kind_of("missing"), None);
    }

    #[test]
    fn test_duplicate_name_fails_fast() {
        let prog = program(vec![deploy("f", vec![int(1)]), deploy("f", vec![int(2)])]);
        let err = collect(&prog).unwrap_err();
        assert!(matches!(err, SymbolError::Duplicate { ref name, .. } if name == "f"));
    }

    #[test]
    fn test_duplicate_across_phases_fails_fast() {
        let prog = program(vec![deploy("f", vec![int(1)]), compile_fn("f", vec![int(2)])]);
        assert!(collect(&prog).is_err());
    }
}
