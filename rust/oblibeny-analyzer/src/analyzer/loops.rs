//! Loop bound validation for `bounded-for` nodes in deploy code.
//!
//! Both bounds must fold to integer literals and describe a non-negative
//! half-open range `[start, end)`. Bounds that do not fold are
//! `UnboundedLoop`; folded bounds with `start > end` are the distinct
//! `InvalidLoopRange`. Together with call-graph acyclicity this validator
//! forms the composite termination verdict: both are necessary, neither
//! alone is sufficient.

use crate::analyzer::fold;
use crate::analyzer::report::Diagnostic;
use crate::analyzer::visit::children;
use oblibeny_core::{Expr, Program};

/// Validate every `bounded-for` reachable from a deploy function body.
///
/// Compile-time code is not walked: unbounded iteration is legal there.
pub fn validate(program: &Program) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (function, body, _) in program.deploy_functions() {
        for expr in body {
            check(expr, function, &mut diagnostics);
        }
    }
    diagnostics
}

fn check(expr: &Expr, function: &str, diagnostics: &mut Vec<Diagnostic>) {
    if let Expr::BoundedFor { var, start, end, loc, .. } = expr {
        match (fold::fold_int(start), fold::fold_int(end)) {
            (Some(s), Some(e)) if s > e => {
                diagnostics.push(Diagnostic::invalid_loop_range(function, *loc, s, e));
            }
            (Some(_), Some(_)) => {}
            _ => {
                diagnostics.push(Diagnostic::unbounded_loop(function, *loc, var));
            }
        }
    }
    for child in children(expr) {
        check(child, function, diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_helpers::{bounded_for, deploy, ident, int, let_, op, program};
    use crate::DiagnosticKind;

    fn validate_body(body: Vec<Expr>) -> Vec<Diagnostic> {
        validate(&program(vec![deploy("f", body)]))
    }

    #[test]
    fn test_literal_bounds_accepted() {
        let diags = validate_body(vec![bounded_for("i", int(0), int(10), vec![int(1)])]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_empty_range_accepted() {
        let diags = validate_body(vec![bounded_for("i", int(5), int(5), vec![int(1)])]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_folded_expression_bounds_accepted() {
        let end = op("*", vec![int(4), int(8)]);
        let diags = validate_body(vec![bounded_for("i", int(0), end, vec![int(1)])]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_enclosing_let_binding_not_visible_to_bounds() {
        let loop_in_let = let_(
            vec![("n", int(16))],
            vec![bounded_for("i", int(0), ident("n"), vec![int(1)])],
        );
        // The bound expression is folded in isolation; `n` is free at the
        // loop node even though an enclosing let binds it to a literal.
        let diags = validate_body(vec![loop_in_let]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnboundedLoop);
    }

    #[test]
    fn test_parameter_bound_is_unbounded() {
        let diags = validate_body(vec![bounded_for("i", int(0), ident("n"), vec![int(1)])]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnboundedLoop);
        assert_eq!(diags[0].function.as_deref(), Some("f"));
    }

    #[test]
    fn test_negative_range_is_invalid_not_unbounded() {
        let diags = validate_body(vec![bounded_for("i", int(10), int(0), vec![int(1)])]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidLoopRange);
    }

    #[test]
    fn test_nested_loops_each_checked() {
        let inner = bounded_for("j", int(0), ident("m"), vec![int(1)]);
        let outer = bounded_for("i", int(3), int(1), vec![inner]);
        let diags = validate_body(vec![outer]);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidLoopRange);
        assert_eq!(diags[1].kind, DiagnosticKind::UnboundedLoop);
    }

    #[test]
    fn test_loop_in_compile_function_not_checked() {
        use crate::testing_helpers::compile_fn;
        let prog = program(vec![compile_fn(
            "gen",
            vec![bounded_for("i", int(0), ident("n"), vec![int(1)])],
        )]);
        assert!(validate(&prog).is_empty());
    }

    #[test]
    fn test_one_diagnostic_per_bad_loop() {
        // Both bounds unresolvable still yields a single diagnostic.
        let diags = validate_body(vec![bounded_for("i", ident("a"), ident("b"), vec![int(1)])]);
        assert_eq!(diags.len(), 1);
    }
}
