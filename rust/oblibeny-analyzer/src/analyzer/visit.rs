//! Read-only child traversal shared by the tree-walking stages.

use oblibeny_core::Expr;

/// Direct children of a node, in source order.
///
/// Every stage walks the immutable tree through this single enumeration so
/// that adding a variant breaks exactly one match.
pub fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::IntLit(..)
        | Expr::FloatLit(..)
        | Expr::BoolLit(..)
        | Expr::StringLit(..)
        | Expr::Ident(..)
        | Expr::Include { .. }
        | Expr::ArrayLit { .. }
        | Expr::Timestamp { .. }
        | Expr::Defcap { .. }
        | Expr::ResourceBudget { .. } => Vec::new(),

        Expr::Call { callee, args, .. } => {
            let mut out = Vec::with_capacity(args.len() + 1);
            out.push(callee.as_ref());
            out.extend(args.iter());
            out
        }

        Expr::DefunDeploy { body, .. }
        | Expr::DefunCompile { body, .. }
        | Expr::Macro { body, .. } => body.iter().collect(),

        Expr::EvalCompile { expr, .. } => vec![expr.as_ref()],

        Expr::BoundedFor { start, end, body, .. } => {
            let mut out = vec![start.as_ref(), end.as_ref()];
            out.extend(body.iter());
            out
        }
        Expr::For { iterable, body, .. } => {
            let mut out = vec![iterable.as_ref()];
            out.extend(body.iter());
            out
        }
        Expr::While { condition, body, .. } => {
            let mut out = vec![condition.as_ref()];
            out.extend(body.iter());
            out
        }
        Expr::WithCapability { capability, body, .. } => {
            let mut out = vec![capability.as_ref()];
            out.extend(body.iter());
            out
        }

        Expr::Let { bindings, body, .. } => {
            let mut out: Vec<&Expr> = bindings.iter().map(|(_, v)| v).collect();
            out.extend(body.iter());
            out
        }
        Expr::Set { value, .. } => vec![value.as_ref()],
        Expr::If { condition, then_branch, else_branch, .. } => {
            vec![condition.as_ref(), then_branch.as_ref(), else_branch.as_ref()]
        }

        Expr::ArrayGet { array, index, .. } => vec![array.as_ref(), index.as_ref()],
        Expr::ArraySet { array, index, value, .. } => {
            vec![array.as_ref(), index.as_ref(), value.as_ref()]
        }
        Expr::ArrayLength { array, .. } => vec![array.as_ref()],

        Expr::GpioSet { device, value, .. } => vec![device.as_ref(), value.as_ref()],
        Expr::GpioGet { device, .. } => vec![device.as_ref()],
        Expr::UartSend { device, data, .. } => vec![device.as_ref(), data.as_ref()],
        Expr::UartRecv { device, .. } => vec![device.as_ref()],
        Expr::SensorRead { sensor, .. } => vec![sensor.as_ref()],
        Expr::NetworkSend { device, data, .. } => vec![device.as_ref(), data.as_ref()],
        Expr::NetworkRecv { device, .. } => vec![device.as_ref()],
        Expr::SleepMs { duration, .. } => vec![duration.as_ref()],
    }
}
