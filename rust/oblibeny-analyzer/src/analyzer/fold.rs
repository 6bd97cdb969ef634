//! Constant folding over closed expressions.
//!
//! Reduces an expression to a literal integer or boolean without performing
//! any unbounded computation: only literals, applications of the fixed
//! arithmetic/comparison operator set to already-folded values, and
//! single-expression `let` bodies over literal bindings are followed.
//! Everything else folds to `None` ("not statically known").
//!
//! The folder is total and deterministic: it is a bounded descent over the
//! finite tree, all arithmetic is checked (overflow and division by zero
//! fold to `None`), and it never panics.

use oblibeny_core::Expr;
use std::collections::HashMap;

/// A fully folded literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldedValue {
    Int(i64),
    Bool(bool),
}

impl FoldedValue {
    pub fn as_int(self) -> Option<i64> {
        match self {
            FoldedValue::Int(n) => Some(n),
            FoldedValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            FoldedValue::Bool(b) => Some(b),
            FoldedValue::Int(_) => None,
        }
    }
}

/// Fold a closed expression to a literal, if statically known.
pub fn fold(expr: &Expr) -> Option<FoldedValue> {
    fold_in(expr, &HashMap::new())
}

/// Fold an expression and require an integer result.
pub fn fold_int(expr: &Expr) -> Option<i64> {
    fold(expr).and_then(FoldedValue::as_int)
}

fn fold_in(expr: &Expr, env: &HashMap<String, FoldedValue>) -> Option<FoldedValue> {
    match expr {
        Expr::IntLit(n, _) => Some(FoldedValue::Int(*n)),
        Expr::BoolLit(b, _) => Some(FoldedValue::Bool(*b)),
        Expr::Ident(name, _) => env.get(name).copied(),

        Expr::Call { callee, args, .. } => {
            let Expr::Ident(op, _) = callee.as_ref() else {
                return None;
            };
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(fold_in(arg, env)?);
            }
            apply_op(op, &values)
        }

        // A `let` is followed only when its body is a single expression:
        // multi-form bodies may assign to bindings before the result is
        // read, which literal folding cannot track.
        Expr::Let { bindings, body, .. } if body.len() == 1 => {
            let mut scope = env.clone();
            for (name, value) in bindings {
                match fold_in(value, &scope) {
                    Some(v) => {
                        scope.insert(name.clone(), v);
                    }
                    None => {
                        // A non-literal binding shadows any outer literal.
                        scope.remove(name);
                    }
                }
            }
            fold_in(&body[0], &scope)
        }

        _ => None,
    }
}

fn apply_op(op: &str, args: &[FoldedValue]) -> Option<FoldedValue> {
    use FoldedValue::{Bool, Int};
    match op {
        "+" | "*" => {
            let (seed, f): (i64, fn(i64, i64) -> Option<i64>) = match op {
                "+" => (0, i64::checked_add),
                _ => (1, i64::checked_mul),
            };
            if args.is_empty() {
                return None;
            }
            let mut acc = seed;
            for v in args {
                acc = f(acc, v.as_int()?)?;
            }
            Some(Int(acc))
        }
        "-" => match args {
            [v] => Some(Int(v.as_int()?.checked_neg()?)),
            [a, b] => Some(Int(a.as_int()?.checked_sub(b.as_int()?)?)),
            _ => None,
        },
        "/" => match args {
            [a, b] => Some(Int(a.as_int()?.checked_div(b.as_int()?)?)),
            _ => None,
        },
        "mod" => match args {
            [a, b] => Some(Int(a.as_int()?.checked_rem(b.as_int()?)?)),
            _ => None,
        },
        "<" | "<=" | ">" | ">=" => match args {
            [a, b] => {
                let (a, b) = (a.as_int()?, b.as_int()?);
                Some(Bool(match op {
                    "<" => a < b,
                    "<=" => a <= b,
                    ">" => a > b,
                    _ => a >= b,
                }))
            }
            _ => None,
        },
        "=" | "!=" => match args {
            [a, b] => {
                let eq = match (a, b) {
                    (Int(x), Int(y)) => x == y,
                    (Bool(x), Bool(y)) => x == y,
                    _ => return None,
                };
                Some(Bool(if op == "=" { eq } else { !eq }))
            }
            _ => None,
        },
        "and" | "or" => {
            if args.is_empty() {
                return None;
            }
            let mut acc = op == "and";
            for v in args {
                let b = v.as_bool()?;
                acc = if op == "and" { acc && b } else { acc || b };
            }
            Some(Bool(acc))
        }
        "not" => match args {
            [v] => Some(Bool(!v.as_bool()?)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_helpers::{bool_lit, ident, int, let_, op};

    #[test]
    fn test_literals_fold_to_themselves() {
        assert_eq!(fold(&int(42)), Some(FoldedValue::Int(42)));
        assert_eq!(fold(&bool_lit(true)), Some(FoldedValue::Bool(true)));
    }

    #[test]
    fn test_free_variable_does_not_fold() {
        assert_eq!(fold(&ident("n")), None);
    }

    #[test]
    fn test_arithmetic_on_folded_literals() {
        assert_eq!(fold_int(&op("+", vec![int(1), int(2), int(3)])), Some(6));
        assert_eq!(fold_int(&op("-", vec![int(10), int(4)])), Some(6));
        assert_eq!(fold_int(&op("*", vec![int(3), int(7)])), Some(21));
        assert_eq!(fold_int(&op("/", vec![int(9), int(2)])), Some(4));
        assert_eq!(fold_int(&op("mod", vec![int(9), int(2)])), Some(1));
        assert_eq!(fold_int(&op("-", vec![int(5)])), Some(-5));
    }

    #[test]
    fn test_comparisons_fold_to_booleans() {
        assert_eq!(fold(&op("<", vec![int(1), int(2)])), Some(FoldedValue::Bool(true)));
        assert_eq!(fold(&op(">=", vec![int(1), int(2)])), Some(FoldedValue::Bool(false)));
        assert_eq!(fold(&op("=", vec![int(3), int(3)])), Some(FoldedValue::Bool(true)));
    }

    #[test]
    fn test_division_by_zero_does_not_fold() {
        assert_eq!(fold(&op("/", vec![int(1), int(0)])), None);
        assert_eq!(fold(&op("mod", vec![int(1), int(0)])), None);
    }

    #[test]
    fn test_overflow_does_not_fold() {
        assert_eq!(fold(&op("+", vec![int(i64::MAX), int(1)])), None);
        assert_eq!(fold(&op("*", vec![int(i64::MAX), int(2)])), None);
        assert_eq!(fold(&op("-", vec![int(i64::MIN)])), None);
    }

    #[test]
    fn test_let_bound_literal_is_followed() {
        let e = let_(vec![("x", int(5))], vec![op("+", vec![ident("x"), int(1)])]);
        assert_eq!(fold_int(&e), Some(6));
    }

    #[test]
    fn test_let_with_non_literal_binding_shadows() {
        // Outer x is literal, inner x is not: the inner body must not fold.
        let inner = let_(vec![("x", ident("unknown"))], vec![ident("x")]);
        let outer = let_(vec![("x", int(1))], vec![inner]);
        assert_eq!(fold(&outer), None);
    }

    #[test]
    fn test_multi_form_let_body_does_not_fold() {
        let e = let_(vec![("x", int(1))], vec![int(0), ident("x")]);
        assert_eq!(fold(&e), None);
    }

    #[test]
    fn test_user_function_calls_never_fold() {
        assert_eq!(fold(&op("helper", vec![int(1)])), None);
    }

    #[test]
    fn test_boolean_connectives() {
        let e = op("and", vec![bool_lit(true), op("not", vec![bool_lit(false)])]);
        assert_eq!(fold(&e), Some(FoldedValue::Bool(true)));
        let e = op("or", vec![bool_lit(false), bool_lit(false)]);
        assert_eq!(fold(&e), Some(FoldedValue::Bool(false)));
    }

    #[test]
    fn test_type_confusion_does_not_fold() {
        assert_eq!(fold(&op("+", vec![int(1), bool_lit(true)])), None);
        assert_eq!(fold(&op("and", vec![int(1), bool_lit(true)])), None);
    }

    #[test]
    fn test_fold_is_deterministic() {
        let e = let_(vec![("a", int(3))], vec![op("*", vec![ident("a"), ident("a")])]);
        assert_eq!(fold_int(&e), fold_int(&e));
        assert_eq!(fold_int(&e), Some(9));
    }
}
