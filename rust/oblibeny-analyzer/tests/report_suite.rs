//! Report serialization shape, fingerprinting, and rendering.

use oblibeny_analyzer::diagnostics::{render_report_plain, render_plain};
use oblibeny_analyzer::testing_helpers::{
    bounded_for, call, deploy, ident, int, program, program_with_budget,
};
use oblibeny_analyzer::analyze;

// ── JSON shape ──────────────────────────────────────────────────────

#[test]
fn report_json_has_the_documented_shape() {
    let prog = program(vec![
        deploy("main", vec![call("helper", vec![])]),
        deploy("helper", vec![bounded_for("i", int(0), ident("n"), vec![int(1)])]),
    ]);
    let report = analyze(&prog).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();

    for verdict in [
        "phase_separation_sound",
        "termination_guaranteed",
        "resource_bounds_respected",
        "well_formed_calls",
    ] {
        assert!(value[verdict].is_boolean(), "missing verdict {}", verdict);
    }

    let per_function = value["per_function"].as_array().unwrap();
    assert_eq!(per_function.len(), 2);
    assert_eq!(per_function[0]["name"], "main");
    // Both functions are poisoned by the unbounded loop (helper directly,
    // main through its call), so their costs are null.
    assert!(per_function[0]["wcet"].is_null());
    assert!(per_function[1]["wcet"].is_null());

    let diagnostics = value["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["kind"], "UnboundedLoop");
    assert_eq!(diagnostics[0]["function"], "helper");
    assert!(diagnostics[0]["location"].is_string());
    assert!(diagnostics[0]["message"].is_string());
}

#[test]
fn safe_report_has_numbers_and_no_diagnostics() {
    let report = analyze(&program(vec![deploy("f", vec![int(1)])])).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(value["per_function"][0]["wcet"], 1);
    assert_eq!(value["per_function"][0]["memory"], 0);
    assert_eq!(value["diagnostics"].as_array().unwrap().len(), 0);
}

// ── Fingerprint ─────────────────────────────────────────────────────

#[test]
fn fingerprints_differ_when_findings_differ() {
    let clean = analyze(&program(vec![deploy("f", vec![int(1)])])).unwrap();
    let broken = analyze(&program(vec![deploy(
        "f",
        vec![bounded_for("i", int(0), ident("n"), vec![int(1)])],
    )]))
    .unwrap();
    assert_ne!(clean.fingerprint(), broken.fingerprint());
}

#[test]
fn fingerprint_is_stable_across_runs() {
    let prog = program_with_budget(
        vec![deploy("f", vec![call("f", vec![])])],
        10,
        10,
        10,
    );
    let fingerprints: Vec<String> =
        (0..3).map(|_| analyze(&prog).unwrap().fingerprint()).collect();
    assert_eq!(fingerprints[0], fingerprints[1]);
    assert_eq!(fingerprints[1], fingerprints[2]);
}

// ── Rendering ───────────────────────────────────────────────────────

#[test]
fn rendered_summary_covers_verdicts_functions_and_findings() {
    let prog = program(vec![
        deploy("steady", vec![int(1)]),
        deploy("loops", vec![bounded_for("i", int(5), int(2), vec![int(1)])]),
    ]);
    let report = analyze(&prog).unwrap();
    let out = render_report_plain(&report);

    assert!(out.contains("phase separation"));
    assert!(out.contains("termination"));
    assert!(out.contains("steady"));
    assert!(out.contains("loops"));
    assert!(out.contains("error[A0203]"));
    assert!(out.contains("= help:"));
}

#[test]
fn diagnostics_render_with_stable_codes() {
    let prog = program(vec![deploy("f", vec![call("missing", vec![])])]);
    let report = analyze(&prog).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let out = render_plain(&report.diagnostics[0]);
    assert!(out.contains("error[A0301]"));
    assert!(out.contains("missing"));
}
