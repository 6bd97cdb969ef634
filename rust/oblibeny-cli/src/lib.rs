//! Oblibeny CLI — command-line driver for the deploy-phase analyzer.
//!
//! Consumes a JSON-serialized program (the upstream parser's output),
//! runs the analysis pipeline, and either renders the report for a
//! terminal or emits the structured JSON document for tooling.

pub mod config;

use oblibeny_analyzer::diagnostics::{render_report_ansi, render_report_plain};
use oblibeny_analyzer::{analyze_with_config, AnalyzeError, AnalyzerConfig, Report};
use oblibeny_core::Program;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid program JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

/// How to print the analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable verdict summary and diagnostics.
    Text,
    /// The structured report document.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Everything `oblibeny analyze` needs.
#[derive(Debug)]
pub struct AnalyzeOptions {
    pub program: PathBuf,
    pub config: Option<PathBuf>,
    pub entry: Option<String>,
    pub budget_time: Option<u64>,
    pub budget_memory: Option<u64>,
    pub budget_network: Option<u64>,
    pub format: OutputFormat,
    pub plain: bool,
}

/// Load a program from the parser's JSON encoding.
pub fn load_program(path: &Path) -> Result<Program, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Run one analysis and return the report plus its rendered output.
pub fn run_analysis(opts: &AnalyzeOptions) -> Result<(Report, String), CliError> {
    let mut program = load_program(&opts.program)?;
    if let Some(entry) = &opts.entry {
        program.entry = Some(entry.clone());
    }
    if let Some(time) = opts.budget_time {
        program.budget.time_units = time;
    }
    if let Some(memory) = opts.budget_memory {
        program.budget.memory_bytes = memory;
    }
    if let Some(network) = opts.budget_network {
        program.budget.network_bytes = network;
    }

    let analyzer_config = match &opts.config {
        Some(path) => config::load(path)?,
        None => AnalyzerConfig::default(),
    };

    let report = analyze_with_config(&program, &analyzer_config)?;
    let rendered = match opts.format {
        OutputFormat::Json => report.to_json(),
        OutputFormat::Text if opts.plain => render_report_plain(&report),
        OutputFormat::Text => render_report_ansi(&report),
    };
    Ok((report, rendered))
}

/// Process exit code for a finished analysis: 0 when safe to deploy,
/// 1 when any diagnostic was found.
pub fn exit_code(report: &Report) -> i32 {
    if report.is_safe() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oblibeny_analyzer::testing_helpers::{call, deploy, int, program};

    fn write_program(dir: &Path, prog: &Program) -> PathBuf {
        let path = dir.join("program.json");
        fs::write(&path, serde_json::to_string(prog).unwrap()).unwrap();
        path
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("oblibeny-cli-test-{}", tag));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn options(path: PathBuf) -> AnalyzeOptions {
        AnalyzeOptions {
            program: path,
            config: None,
            entry: None,
            budget_time: None,
            budget_memory: None,
            budget_network: None,
            format: OutputFormat::Text,
            plain: true,
        }
    }

    #[test]
    fn test_safe_program_exits_zero() {
        let dir = temp_dir("safe");
        let path = write_program(&dir, &program(vec![deploy("main", vec![int(1)])]));
        let (report, rendered) = run_analysis(&options(path)).unwrap();
        assert_eq!(exit_code(&report), 0);
        assert!(rendered.contains("ok"));
    }

    #[test]
    fn test_diagnostics_exit_one() {
        let dir = temp_dir("diag");
        let path =
            write_program(&dir, &program(vec![deploy("main", vec![call("ghost", vec![])])]));
        let (report, _) = run_analysis(&options(path)).unwrap();
        assert_eq!(exit_code(&report), 1);
    }

    #[test]
    fn test_budget_override_applies() {
        let dir = temp_dir("budget");
        let path = write_program(&dir, &program(vec![deploy("main", vec![int(1), int(2)])]));
        let mut opts = options(path);
        opts.budget_time = Some(1);
        let (report, _) = run_analysis(&opts).unwrap();
        assert!(!report.resource_bounds_respected);
    }

    #[test]
    fn test_json_format_emits_the_document() {
        let dir = temp_dir("json");
        let path = write_program(&dir, &program(vec![deploy("main", vec![int(1)])]));
        let mut opts = options(path);
        opts.format = OutputFormat::Json;
        let (_, rendered) = run_analysis(&opts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["phase_separation_sound"], true);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let opts = options(PathBuf::from("/nonexistent/program.json"));
        assert!(matches!(run_analysis(&opts), Err(CliError::Read { .. })));
    }
}
