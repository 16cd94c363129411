//! Performance Statistics Library
//!
//! Aggregates timing measurements recorded during end-to-end test runs into
//! a single CSV report with one row per scope or endpoint and one column per
//! database backend.
//!
//! # Inputs
//!
//! - Raw logs: CSV files with `method`, `endpoint` and `duration(ms)`
//!   columns, one file per database. Durations are averaged per endpoint.
//! - Summary files: free text with `scope: duration` lines. Only core scopes
//!   are kept and a later file overwrites an earlier value.
//!
//! Every input filename embeds a database token (`mongodb+srv`, `mongodb`
//! or `mariadb`) that decides which column its values land in.
//!
//! The library never initializes logging; it only emits through the `log`
//! facade. Setting up a logger is left to the application (perf-stats-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use perf_stats::{ReportConfig, ReportGenerator};
//!
//! let config = ReportConfig::new()
//!     .with_perf_log_dir("performanceMeasurements/logs")
//!     .with_results_log_dir("tests/e2e/results")
//!     .with_output_path("performanceMeasurements/stats.csv")
//!     .with_clean_on_start(false);
//!
//! let generator = ReportGenerator::new(config);
//! let written = generator.generate_report().unwrap();
//! println!("Report at {:?}", written);
//! ```

// Public modules
pub mod cleanup;
pub mod config;
pub mod endpoint_stats;
pub mod generator;
pub mod report;
pub mod scope_stats;
pub mod scopes;
pub mod types;

// Re-export main types for convenience
pub use cleanup::{clean_log_dir, CleanupSummary};
pub use config::ReportConfig;
pub use endpoint_stats::EndpointStats;
pub use generator::ReportGenerator;
pub use report::Report;
pub use scopes::{ScopeFilter, CORE_SCOPES, EXCLUDED_SCOPES};
pub use types::{DatabaseType, Measurement, ReportRow, Result, StatsError};

// Internal modules (not exposed in public API)
mod files;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a generator over empty directories yields an empty report
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new()
            .with_perf_log_dir(dir.path().join("logs"))
            .with_results_log_dir(dir.path().join("results"));
        let report = ReportGenerator::new(config).build_report().unwrap();
        assert!(report.rows().is_empty());
    }
}
