//! Stable diagnostic codes for all `DiagnosticKind` values.
//!
//! Code ranges:
//!   A0100–A0199  Phase separation
//!   A0200–A0299  Termination
//!   A0300–A0399  Call well-formedness
//!   A0400–A0499  Resource budgets

use crate::analyzer::report::DiagnosticKind;

pub fn diagnostic_code(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::PhaseViolation => "A0101",
        DiagnosticKind::RecursionDetected => "A0201",
        DiagnosticKind::UnboundedLoop => "A0202",
        DiagnosticKind::InvalidLoopRange => "A0203",
        DiagnosticKind::UnknownCallee => "A0301",
        DiagnosticKind::ResourceBudgetExceeded => "A0401",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = DiagnosticKind::iter().map(diagnostic_code).collect();
        let len = codes.len();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), len);
    }
}
