//! Diagnostic taxonomy and the aggregated analysis report.
//!
//! Diagnostics are never process-fatal: every stage appends to its own list
//! and the aggregator merges them into a single `Report` carrying four
//! independent verdicts. The report is the sole contract with surrounding
//! tooling; its JSON shape is stable and byte-deterministic for a given
//! tree.

use oblibeny_core::SourceLoc;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use strum_macros::{Display as StrumDisplay, EnumIter};

// ── Diagnostic taxonomy ─────────────────────────────────────────────

/// The closed set of finding kinds the analyzer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter)]
pub enum DiagnosticKind {
    /// Compile-only construct reachable from deploy code.
    PhaseViolation,
    /// Function participates in a call-graph cycle.
    RecursionDetected,
    /// `bounded-for` bounds do not fold to integer literals.
    UnboundedLoop,
    /// Folded bounds with start greater than end.
    InvalidLoopRange,
    /// Application target does not resolve to any known function.
    UnknownCallee,
    /// Computed worst-case cost exceeds the declared budget.
    ResourceBudgetExceeded,
}

/// A single reported finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Deploy function the finding is attributed to, when applicable.
    pub function: Option<String>,
    pub loc: Option<SourceLoc>,
    pub message: String,
}

impl Diagnostic {
    pub fn phase_violation(function: &str, loc: SourceLoc, construct: &str) -> Self {
        Self {
            kind: DiagnosticKind::PhaseViolation,
            function: Some(function.to_string()),
            loc: Some(loc),
            message: format!(
                "compile-only construct in deploy function '{}': {}",
                function, construct
            ),
        }
    }

    pub fn recursion_detected(function: &str, loc: SourceLoc) -> Self {
        Self {
            kind: DiagnosticKind::RecursionDetected,
            function: Some(function.to_string()),
            loc: Some(loc),
            message: format!("deploy function '{}' participates in a call cycle", function),
        }
    }

    pub fn unbounded_loop(function: &str, loc: SourceLoc, var: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnboundedLoop,
            function: Some(function.to_string()),
            loc: Some(loc),
            message: format!(
                "bounds of (bounded-for {} ...) do not fold to integer literals",
                var
            ),
        }
    }

    pub fn invalid_loop_range(function: &str, loc: SourceLoc, start: i64, end: i64) -> Self {
        Self {
            kind: DiagnosticKind::InvalidLoopRange,
            function: Some(function.to_string()),
            loc: Some(loc),
            message: format!("loop range [{}, {}) has start greater than end", start, end),
        }
    }

    pub fn unknown_callee(function: &str, loc: SourceLoc, what: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnknownCallee,
            function: Some(function.to_string()),
            loc: Some(loc),
            message: format!("call in '{}' does not resolve: {}", function, what),
        }
    }

    pub fn budget_exceeded(function: &str, resource: &str, computed: u64, budget: u64) -> Self {
        Self {
            kind: DiagnosticKind::ResourceBudgetExceeded,
            function: Some(function.to_string()),
            loc: None,
            message: format!(
                "worst-case {} of '{}' is {}, budget allows {}",
                resource, function, computed, budget
            ),
        }
    }
}

// The wire shape wants `kind` as the taxonomy name and `location` as a
// "line:col" string or null, so serialization is spelled out by hand.
impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Diagnostic", 4)?;
        s.serialize_field("kind", &self.kind.to_string())?;
        s.serialize_field("function", &self.function)?;
        s.serialize_field("location", &self.loc.map(|l| l.to_string()))?;
        s.serialize_field("message", &self.message)?;
        s.end()
    }
}

// ── Per-function cost summary ───────────────────────────────────────

/// Cost figures for one deploy function; `None` when cost is undefined
/// (recursion, unresolvable loop bounds, phase-violating or unresolved
/// calls anywhere in the function's call tree).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub wcet: Option<u64>,
    pub memory: Option<u64>,
}

// ── Report ──────────────────────────────────────────────────────────

/// The aggregated result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub phase_separation_sound: bool,
    pub termination_guaranteed: bool,
    pub resource_bounds_respected: bool,
    pub well_formed_calls: bool,
    pub per_function: Vec<FunctionReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Pure reducer over the merged diagnostic list. Every verdict is
    /// always evaluated; none is skipped because another failed.
    pub fn aggregate(diagnostics: Vec<Diagnostic>, per_function: Vec<FunctionReport>) -> Self {
        let none_of = |kinds: &[DiagnosticKind]| {
            !diagnostics.iter().any(|d| kinds.contains(&d.kind))
        };
        Report {
            phase_separation_sound: none_of(&[DiagnosticKind::PhaseViolation]),
            termination_guaranteed: none_of(&[
                DiagnosticKind::RecursionDetected,
                DiagnosticKind::UnboundedLoop,
                DiagnosticKind::InvalidLoopRange,
            ]),
            resource_bounds_respected: none_of(&[DiagnosticKind::ResourceBudgetExceeded]),
            well_formed_calls: none_of(&[DiagnosticKind::UnknownCallee]),
            per_function,
            diagnostics,
        }
    }

    /// True iff every verdict holds (equivalently: no diagnostics at all).
    pub fn is_safe(&self) -> bool {
        self.phase_separation_sound
            && self.termination_guaranteed
            && self.resource_bounds_respected
            && self.well_formed_calls
    }

    /// Pretty JSON document for tooling.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            panic!("report serialization cannot fail: {}", e);
        })
    }

    /// Compact canonical JSON, the hashing input for `fingerprint`.
    pub fn to_canonical_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            panic!("report serialization cannot fail: {}", e);
        })
    }

    /// Content digest of the canonical encoding. Two runs over the same
    /// tree produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        format!("sha256:{:x}", Sha256::digest(self.to_canonical_json().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            kind,
            function: Some("f".to_string()),
            loc: Some(SourceLoc::new(1, 1)),
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_empty_report_is_safe() {
        let report = Report::aggregate(vec![], vec![]);
        assert!(report.is_safe());
        assert!(report.phase_separation_sound);
        assert!(report.termination_guaranteed);
        assert!(report.resource_bounds_respected);
        assert!(report.well_formed_calls);
    }

    #[test]
    fn test_each_kind_flips_exactly_one_verdict() {
        let cases: &[(DiagnosticKind, fn(&Report) -> bool)] = &[
            (DiagnosticKind::PhaseViolation, |r| r.phase_separation_sound),
            (DiagnosticKind::RecursionDetected, |r| r.termination_guaranteed),
            (DiagnosticKind::UnboundedLoop, |r| r.termination_guaranteed),
            (DiagnosticKind::InvalidLoopRange, |r| r.termination_guaranteed),
            (DiagnosticKind::UnknownCallee, |r| r.well_formed_calls),
            (DiagnosticKind::ResourceBudgetExceeded, |r| r.resource_bounds_respected),
        ];
        for (kind, verdict) in cases {
            let report = Report::aggregate(vec![diag(*kind)], vec![]);
            assert!(!verdict(&report), "{} should flip its verdict", kind);
            assert!(!report.is_safe());
            // The other three verdicts stay true.
            let verdicts = [
                report.phase_separation_sound,
                report.termination_guaranteed,
                report.resource_bounds_respected,
                report.well_formed_calls,
            ];
            assert_eq!(verdicts.iter().filter(|v| !**v).count(), 1);
        }
    }

    #[test]
    fn test_kind_names_match_taxonomy() {
        assert_eq!(DiagnosticKind::PhaseViolation.to_string(), "PhaseViolation");
        assert_eq!(
            DiagnosticKind::ResourceBudgetExceeded.to_string(),
            "ResourceBudgetExceeded"
        );
    }

    #[test]
    fn test_diagnostic_serialization_shape() {
        let d = diag(DiagnosticKind::UnboundedLoop);
        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&d).unwrap()).unwrap();
        assert_eq!(value["kind"], "UnboundedLoop");
        assert_eq!(value["function"], "f");
        assert_eq!(value["location"], "1:1");
        assert_eq!(value["message"], "test");
    }

    #[test]
    fn test_null_cost_serializes_as_null() {
        let report = Report::aggregate(
            vec![],
            vec![FunctionReport { name: "f".to_string(), wcet: None, memory: None }],
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_canonical_json()).unwrap();
        assert!(value["per_function"][0]["wcet"].is_null());
        assert!(value["per_function"][0]["memory"].is_null());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let report = Report::aggregate(vec![diag(DiagnosticKind::PhaseViolation)], vec![]);
        let again = report.clone();
        assert_eq!(report.fingerprint(), again.fingerprint());
        assert!(report.fingerprint().starts_with("sha256:"));
    }
}
