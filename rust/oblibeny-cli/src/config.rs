//! Analyzer configuration files.
//!
//! A config file is TOML with `[phase]` and `[costs]` tables; every field
//! is optional and unnamed fields keep the analyzer defaults, so a file
//! can override a single cost constant.

use crate::CliError;
use oblibeny_analyzer::AnalyzerConfig;
use std::fs;
use std::path::Path;

/// Load an `AnalyzerConfig` from a TOML file.
pub fn load(path: &Path) -> Result<AnalyzerConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Default configuration rendered as TOML, a starting point for overrides.
pub fn default_toml() -> String {
    toml::to_string_pretty(&AnalyzerConfig::default()).unwrap_or_else(|e| {
        panic!("default config serialization cannot fail: {}", e);
    })
}
