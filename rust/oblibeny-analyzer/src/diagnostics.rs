//! Terminal rendering for diagnostics and reports.
//!
//! Two renderers: ANSI-colored for interactive use and plain for tests and
//! machine-adjacent consumers. The structured report JSON is the contract
//! with tooling; this module only exists for humans.

use crate::analyzer::codes::diagnostic_code;
use crate::analyzer::report::{Diagnostic, DiagnosticKind, Report};

// ANSI color helpers
fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}

fn green(s: &str) -> String {
    format!("\x1b[32m{}\x1b[0m", s)
}

fn cyan(s: &str) -> String {
    format!("\x1b[36m{}\x1b[0m", s)
}

fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Fixed help text per diagnostic kind.
fn help_for(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::PhaseViolation => {
            "move the construct into a defun-compile, or expand it before deployment"
        }
        DiagnosticKind::RecursionDetected => {
            "deploy code must not recurse; restructure into bounded iteration"
        }
        DiagnosticKind::UnboundedLoop => {
            "bounded-for start and end must fold to integer literals"
        }
        DiagnosticKind::InvalidLoopRange => "swap the bounds or widen the range",
        DiagnosticKind::UnknownCallee => {
            "define the function in this program or use a built-in primitive"
        }
        DiagnosticKind::ResourceBudgetExceeded => {
            "raise the declared budget or reduce the function's worst-case work"
        }
    }
}

/// Render one diagnostic without colors.
pub fn render_plain(diag: &Diagnostic) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "error[{}]: {}\n",
        diagnostic_code(diag.kind),
        diag.message
    ));
    match (&diag.function, diag.loc) {
        (Some(function), Some(loc)) => {
            out.push_str(&format!("  --> {} at {}\n", function, loc));
        }
        (Some(function), None) => {
            out.push_str(&format!("  --> {}\n", function));
        }
        (None, Some(loc)) => {
            out.push_str(&format!("  --> {}\n", loc));
        }
        (None, None) => {}
    }
    out.push_str(&format!("   = help: {}\n", help_for(diag.kind)));
    out
}

/// Render one diagnostic with ANSI colors for the terminal.
pub fn render_ansi(diag: &Diagnostic) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}[{}]: {}\n",
        red("error"),
        bold(diagnostic_code(diag.kind)),
        bold(&diag.message)
    ));
    match (&diag.function, diag.loc) {
        (Some(function), Some(loc)) => {
            out.push_str(&format!("  {} {} at {}\n", cyan("-->"), function, loc));
        }
        (Some(function), None) => {
            out.push_str(&format!("  {} {}\n", cyan("-->"), function));
        }
        (None, Some(loc)) => {
            out.push_str(&format!("  {} {}\n", cyan("-->"), loc));
        }
        (None, None) => {}
    }
    out.push_str(&format!(
        "   {} {}: {}\n",
        cyan("="),
        cyan("help"),
        help_for(diag.kind)
    ));
    out
}

fn verdict_line(label: &str, ok: bool, color: bool) -> String {
    let mark = if ok { "ok" } else { "FAILED" };
    let mark = if !color {
        mark.to_string()
    } else if ok {
        green(mark)
    } else {
        red(mark)
    };
    format!("  {:<26} {}\n", label, mark)
}

fn render_report(report: &Report, color: bool) -> String {
    let mut out = String::new();
    out.push_str("verdicts:\n");
    out.push_str(&verdict_line("phase separation", report.phase_separation_sound, color));
    out.push_str(&verdict_line("termination", report.termination_guaranteed, color));
    out.push_str(&verdict_line("resource bounds", report.resource_bounds_respected, color));
    out.push_str(&verdict_line("well-formed calls", report.well_formed_calls, color));

    if !report.per_function.is_empty() {
        out.push_str("\nper-function worst case:\n");
        for f in &report.per_function {
            let wcet = f.wcet.map(|v| v.to_string()).unwrap_or_else(|| "unbounded".to_string());
            let memory =
                f.memory.map(|v| v.to_string()).unwrap_or_else(|| "unbounded".to_string());
            out.push_str(&format!(
                "  {:<20} time {:>12}  memory {:>12}\n",
                f.name, wcet, memory
            ));
        }
    }

    if !report.diagnostics.is_empty() {
        out.push('\n');
        for diag in &report.diagnostics {
            let rendered = if color { render_ansi(diag) } else { render_plain(diag) };
            out.push_str(&rendered);
        }
    }
    out
}

/// Full report summary without colors.
pub fn render_report_plain(report: &Report) -> String {
    render_report(report, false)
}

/// Full report summary with ANSI colors.
pub fn render_report_ansi(report: &Report) -> String {
    render_report(report, true)
}
