//! Oblibeny Analyzer
//!
//! Static safety analysis for two-phase Oblibeny programs: decides, before
//! any execution, whether the deploy-time portion of a program is safe to
//! run unattended on a device. Four independent properties are checked —
//! phase separation, termination (acyclic calls + bounded loops), resource
//! budgets, and call well-formedness — and every finding is collected into
//! one [`Report`]; the analyzer never stops at the first problem.
//!
//! The analyzer holds no state between runs and performs no I/O. Its one
//! fail-fast condition is a program with duplicate definition names, which
//! later stages could only resolve by silently picking a candidate.

pub mod analyzer;
pub mod diagnostics;
pub mod testing_helpers;

use analyzer::symbols::SymbolError;
use analyzer::{call_graph, cost, cycles, loops, phase, symbols};
use oblibeny_core::Program;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analyzer::cost::{CostTable, FunctionCost};
pub use analyzer::phase::PhaseConfig;
pub use analyzer::report::{Diagnostic, DiagnosticKind, FunctionReport, Report};

// ── Analyzer options ────────────────────────────────────────────────

/// Configuration for one analysis run.
///
/// Both fields default to the standard language profile; a TOML override
/// file may name only the pieces it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub phase: PhaseConfig,
    pub costs: CostTable,
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Symbols(#[from] SymbolError),
}

/// Analyze a program with the default configuration.
pub fn analyze(program: &Program) -> Result<Report, AnalyzeError> {
    analyze_with_config(program, &AnalyzerConfig::default())
}

/// Run the full pipeline and aggregate every stage's findings.
///
/// Stage order follows the dependency graph; the diagnostic list keeps
/// stage grouping (phase, recursion, loops, unknown callees, budget) so
/// reports are byte-identical across runs on the same tree.
pub fn analyze_with_config(
    program: &Program,
    config: &AnalyzerConfig,
) -> Result<Report, AnalyzeError> {
    let symbols = symbols::collect(program)?;

    let mut diagnostics = phase::classify(program, &symbols, &config.phase);

    let built = call_graph::build(program, &symbols, &config.costs);
    let cycle_info = cycles::detect(&built.graph);
    diagnostics.extend(cycles::diagnostics(&built.graph, &cycle_info));

    diagnostics.extend(loops::validate(program));
    diagnostics.extend(built.diagnostics);

    let estimate = cost::estimate(
        program,
        &built.graph,
        &cycle_info,
        &symbols,
        &config.costs,
        &program.budget,
        program.entry.as_deref(),
    );
    diagnostics.extend(estimate.diagnostics);

    let per_function = built
        .graph
        .ids()
        .map(|id| {
            let name = built.graph.name(id);
            let cost = estimate.profiles.get(name).copied().flatten();
            FunctionReport {
                name: name.to_string(),
                wcet: cost.map(|c| c.wcet),
                memory: cost.map(|c| c.memory),
            }
        })
        .collect();

    Ok(Report::aggregate(diagnostics, per_function))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_helpers::{call, deploy, int, program};

    #[test]
    fn test_clean_program_is_safe() {
        let report = analyze(&program(vec![deploy("main", vec![int(1)])])).unwrap();
        assert!(report.is_safe());
        assert_eq!(report.per_function.len(), 1);
        assert_eq!(report.per_function[0].name, "main");
    }

    #[test]
    fn test_duplicate_definitions_fail_fast() {
        let prog = program(vec![deploy("f", vec![int(1)]), deploy("f", vec![int(2)])]);
        assert!(analyze(&prog).is_err());
    }

    #[test]
    fn test_per_function_in_declaration_order() {
        let report = analyze(&program(vec![
            deploy("zeta", vec![call("alpha", vec![])]),
            deploy("alpha", vec![int(1)]),
        ]))
        .unwrap();
        let names: Vec<&str> = report.per_function.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = AnalyzerConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: AnalyzerConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
