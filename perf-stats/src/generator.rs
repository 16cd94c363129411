//! Main report generator API
//!
//! The `ReportGenerator` is the entry point of the library. Creating one
//! optionally clears the raw log directory; generating a report reads both
//! input directories, merges the statistics and writes a timestamped CSV.

use crate::cleanup::{clean_log_dir, CleanupSummary};
use crate::config::ReportConfig;
use crate::endpoint_stats::{calculate_endpoint_stats, EndpointStats};
use crate::report::{timestamped_path, Report};
use crate::scope_stats::calculate_scope_stats;
use crate::scopes::ScopeFilter;
use crate::types::{ReportRow, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Aggregates raw logs and summaries into a statistics report
pub struct ReportGenerator {
    config: ReportConfig,
    filter: ScopeFilter,
}

impl ReportGenerator {
    /// Create a generator
    ///
    /// When `config.clean_on_start` is set, every file in the raw log
    /// directory is deleted first. Deletion failures are logged, not returned.
    ///
    /// # Example
    /// ```no_run
    /// use perf_stats::{ReportConfig, ReportGenerator};
    ///
    /// let config = ReportConfig::new().with_clean_on_start(false);
    /// let generator = ReportGenerator::new(config);
    /// let path = generator.generate_report().unwrap();
    /// println!("Report written to {:?}", path);
    /// ```
    pub fn new(config: ReportConfig) -> Self {
        let generator = Self {
            config,
            filter: ScopeFilter::default(),
        };
        if generator.config.clean_on_start {
            generator.clean_logs();
        }
        generator
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Delete every file in the raw log directory
    pub fn clean_logs(&self) -> CleanupSummary {
        let summary = clean_log_dir(&self.config.perf_log_dir);
        log::debug!(
            "Cleanup of {:?}: {} deleted, {} failed",
            self.config.perf_log_dir,
            summary.deleted.len(),
            summary.failed.len()
        );
        summary
    }

    /// Per-scope statistics from the summary directory, in category order
    pub fn calculate_global_stats(&self) -> Result<Vec<ReportRow>> {
        calculate_scope_stats(&self.config.results_log_dir, &self.filter).map_err(|e| {
            log::error!("Error calculating global stats: {}", e);
            e
        })
    }

    /// Per-endpoint averages from the raw log directory
    pub fn calculate_endpoint_stats(&self) -> Result<EndpointStats> {
        calculate_endpoint_stats(&self.config.perf_log_dir).map_err(|e| {
            log::error!("Error calculating endpoint stats: {}", e);
            e
        })
    }

    /// Build the full report without writing it
    pub fn build_report(&self) -> Result<Report> {
        let scope_rows = self.calculate_global_stats()?;
        let endpoints = self.calculate_endpoint_stats()?;
        log::debug!(
            "Assembling report: {} scopes, {} endpoints",
            scope_rows.len(),
            endpoints.len()
        );
        Ok(Report::assemble(scope_rows, endpoints))
    }

    /// Generate and write the report, returning the path written
    pub fn generate_report(&self) -> Result<PathBuf> {
        self.generate_report_at(&Local::now())
    }

    /// Generate and write the report using `now` for the filename timestamp
    pub fn generate_report_at(&self, now: &DateTime<Local>) -> Result<PathBuf> {
        let report = self.build_report()?;
        let path = timestamped_path(&self.config.output_path, now);

        report.write_file(&path).map_err(|e| {
            log::error!("Error generating performance report: {}", e);
            e
        })?;

        log::info!("Performance report generated successfully at {:?}", path);
        Ok(path)
    }
}
