//! Global (per-scope) statistics from test summary files
//!
//! Summary files are free text written by the e2e test reporter. Any line
//! containing a colon is read as `label: duration`. The label is taken from
//! before the first colon and the duration from after the last one.

use crate::files::list_csv_files;
use crate::scopes::{normalize_scope_label, parse_duration, ScopeFilter};
use crate::types::{DatabaseType, Measurement, ReportRow, Result, StatsError};
use std::fs;
use std::path::Path;

/// Parse the scope measurements of one summary file
///
/// Only labels accepted by `filter` are returned. Malformed durations are
/// read as 0.0 rather than failing the file.
pub fn parse_summary(content: &str, database: DatabaseType, filter: &ScopeFilter) -> Vec<Measurement> {
    content
        .lines()
        .filter_map(|line| {
            let (raw_label, _) = line.split_once(':')?;
            let label = normalize_scope_label(raw_label);
            if !filter.accepts(&label) {
                return None;
            }
            let (_, raw_duration) = line.rsplit_once(':')?;
            Some(Measurement {
                label,
                database,
                duration_ms: parse_duration(raw_duration),
            })
        })
        .collect()
}

/// Calculate the global statistics for every summary file in `dir`
///
/// A later file overwrites an earlier value for the same scope and database;
/// no averaging happens here. Rows come back in category order.
pub fn calculate_scope_stats(dir: &Path, filter: &ScopeFilter) -> Result<Vec<ReportRow>> {
    let mut rows: Vec<ReportRow> = Vec::new();

    for path in list_csv_files(dir)? {
        let database = match DatabaseType::classify_path(&path) {
            Ok(database) => database,
            Err(e) => {
                log::warn!("Skipping summary file: {}", e);
                continue;
            }
        };

        log::info!("Processing summary file: {:?} ({})", path, database);
        let content = fs::read_to_string(&path).map_err(|source| StatsError::FileRead {
            path: path.clone(),
            source,
        })?;

        for measurement in parse_summary(&content, database, filter) {
            match rows.iter_mut().find(|row| row.label == measurement.label) {
                Some(row) => row.set(database, measurement.duration_ms),
                None => rows.push(
                    ReportRow::new(measurement.label).with_value(database, measurement.duration_ms),
                ),
            }
        }
    }

    rows.sort_by(|a, b| filter.compare(&a.label, &b.label));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary_filters_and_normalizes() {
        let content = "Test Results: 12 passed\n\
                       Files Summary: 4\n\
                       orders.test.js: 30ms\n\
                       restaurantCategories.test.js: 9ms\n\
                       payments.test.js: 11ms\n\
                       no colon here\n\
                       Total Tests: 120 ms\n";

        let measurements = parse_summary(content, DatabaseType::MongoDb, &ScopeFilter::default());
        let labels: Vec<_> = measurements.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["orders", "global"]);
        assert_eq!(measurements[1].duration_ms, 120.0);
    }

    #[test]
    fn test_duration_after_last_colon() {
        let measurements = parse_summary(
            "auth.test.js: took: 17ms\n",
            DatabaseType::MariaDb,
            &ScopeFilter::default(),
        );
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].duration_ms, 17.0);
    }

    #[test]
    fn test_malformed_duration_defaults_to_zero() {
        let measurements =
            parse_summary("users.test.js: slow\n", DatabaseType::MariaDb, &ScopeFilter::default());
        assert_eq!(measurements[0].duration_ms, 0.0);
    }

    #[test]
    fn test_merge_and_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("results_mongodb.csv"),
            "products.test.js: 8ms\nglobal: 45ms\n",
        )
        .unwrap();
        fs::write(dir.path().join("results_mariadb.csv"), "Total Tests:60 ms\n").unwrap();
        fs::write(dir.path().join("results_sqlite.csv"), "global: 1ms\n").unwrap();

        let rows = calculate_scope_stats(dir.path(), &ScopeFilter::default()).unwrap();
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["global", "products"]);

        let global = &rows[0];
        assert_eq!(global.get(DatabaseType::MongoDb), Some(45.0));
        assert_eq!(global.get(DatabaseType::MariaDb), Some(60.0));
        assert_eq!(global.get(DatabaseType::MongoDbAtlas), None);
    }

    #[test]
    fn test_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_results_mongodb.csv"), "orders.test.js: 100ms\n").unwrap();
        fs::write(dir.path().join("b_results_mongodb.csv"), "orders.test.js: 200ms\n").unwrap();

        let rows = calculate_scope_stats(dir.path(), &ScopeFilter::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(DatabaseType::MongoDb), Some(200.0));
    }
}
