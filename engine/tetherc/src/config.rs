//! Driver configuration from command-line flags.

use tether_attrib::{AnalysisConfig, ScopeContainment};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for `{flag}`: expected a line count")]
    InvalidCount { flag: &'static str, value: String },
}

/// Everything the driver needs besides file paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    pub analysis: AnalysisConfig,
    /// Analyze cases on a thread pool.
    pub parallel: bool,
    pub verbose: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            analysis: AnalysisConfig::default(),
            parallel: true,
            verbose: false,
        }
    }
}

fn parse_count(flag: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidCount {
        flag,
        value: value.to_string(),
    })
}

impl BatchConfig {
    /// Apply one option flag. Returns `Ok(false)` when `arg` is not an
    /// option this config knows.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, ConfigError> {
        let tolerance = &mut self.analysis.tolerance;
        if let Some(value) = arg.strip_prefix("--tolerance=") {
            let lines = parse_count("--tolerance", value)?;
            tolerance.before = lines;
            tolerance.after = lines;
        } else if let Some(value) = arg.strip_prefix("--before=") {
            tolerance.before = parse_count("--before", value)?;
        } else if let Some(value) = arg.strip_prefix("--after=") {
            tolerance.after = parse_count("--after", value)?;
        } else {
            match arg {
                "--no-scope" => self.analysis.scope_filter = false,
                "--ignore-range" => self.analysis.ignore_range = true,
                "--legacy-scope" => self.analysis.containment = ScopeContainment::Legacy,
                "--no-parallel" => self.parallel = false,
                "-v" | "--verbose" => self.verbose = true,
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}
