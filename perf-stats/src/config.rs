//! Report generator configuration
//!
//! Holds the input directories and output location used by the generator.
//! Every field has a default matching the layout of the e2e test harness,
//! so a configuration file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory holding raw per-request timing logs
pub const DEFAULT_PERF_LOG_DIR: &str = "performanceMeasurements/logs";

/// Default directory holding per-suite summary files
pub const DEFAULT_RESULTS_LOG_DIR: &str = "tests/e2e/results";

/// Default base path of the generated report
pub const DEFAULT_OUTPUT_PATH: &str = "performanceMeasurements/stats.csv";

/// Configuration for the report generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory of raw timing logs (`method,endpoint,duration(ms)` CSV)
    pub perf_log_dir: PathBuf,

    /// Directory of summary files (`scope: duration` lines)
    pub results_log_dir: PathBuf,

    /// Base output file; a timestamp is inserted before the extension
    pub output_path: PathBuf,

    /// Delete every file in `perf_log_dir` when the generator is created
    pub clean_on_start: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            perf_log_dir: PathBuf::from(DEFAULT_PERF_LOG_DIR),
            results_log_dir: PathBuf::from(DEFAULT_RESULTS_LOG_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            clean_on_start: true,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the raw log directory
    pub fn with_perf_log_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.perf_log_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Builder method: set the summary directory
    pub fn with_results_log_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.results_log_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Builder method: set the base output path
    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = path.as_ref().to_path_buf();
        self
    }

    /// Builder method: enable or disable cleanup on start
    pub fn with_clean_on_start(mut self, enabled: bool) -> Self {
        self.clean_on_start = enabled;
        self
    }
}
