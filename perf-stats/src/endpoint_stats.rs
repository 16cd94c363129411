//! Endpoint statistics from raw timing logs
//!
//! Raw logs are CSV files with at least the columns `method`, `endpoint` and
//! `duration(ms)`, one file per database. Every request duration is
//! collected per (endpoint, database) pair and averaged.

use crate::files::list_csv_files;
use crate::scopes::parse_duration_strict;
use crate::types::{DatabaseType, Measurement, ReportRow, Result, StatsError};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

const METHOD_COLUMN: &str = "method";
const ENDPOINT_COLUMN: &str = "endpoint";
const DURATION_COLUMN: &str = "duration(ms)";

/// Substrings (lower-case) that drop an endpoint from the statistics
const EXCLUDED_ENDPOINT_MARKERS: [&str; 2] = ["categories", "test"];

/// Average duration per endpoint and database
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointStats {
    rows: BTreeMap<String, ReportRow>,
}

impl EndpointStats {
    /// Averages for one endpoint key (`"GET - /orders"`)
    pub fn get(&self, endpoint: &str) -> Option<&ReportRow> {
        self.rows.get(endpoint)
    }

    /// Average for one endpoint on one database
    pub fn average(&self, endpoint: &str, database: DatabaseType) -> Option<f64> {
        self.rows.get(endpoint).and_then(|row| row.get(database))
    }

    /// Endpoint keys in report order
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert into report rows, sorted by endpoint key
    pub fn into_rows(self) -> Vec<ReportRow> {
        self.rows.into_values().collect()
    }
}

/// Accumulates durations until averages are requested
#[derive(Debug, Default)]
struct EndpointAccumulator {
    samples: BTreeMap<String, BTreeMap<DatabaseType, Vec<f64>>>,
}

impl EndpointAccumulator {
    fn add(&mut self, measurement: Measurement) {
        self.samples
            .entry(measurement.label)
            .or_default()
            .entry(measurement.database)
            .or_default()
            .push(measurement.duration_ms);
    }

    fn finish(self) -> EndpointStats {
        let rows = self
            .samples
            .into_iter()
            .map(|(endpoint, per_db)| {
                let mut row = ReportRow::new(endpoint.clone());
                for (database, values) in per_db {
                    if !values.is_empty() {
                        let mean = values.iter().sum::<f64>() / values.len() as f64;
                        row.set(database, mean);
                    }
                }
                (endpoint, row)
            })
            .collect();
        EndpointStats { rows }
    }
}

/// Calculate endpoint statistics for every raw log in `dir`
///
/// Files without a database token are skipped. Any other failure aborts the
/// whole calculation.
pub fn calculate_endpoint_stats(dir: &Path) -> Result<EndpointStats> {
    let mut accumulator = EndpointAccumulator::default();

    for path in list_csv_files(dir)? {
        let database = match DatabaseType::classify_path(&path) {
            Ok(database) => database,
            Err(e) => {
                log::warn!("Skipping raw log: {}", e);
                continue;
            }
        };

        let measurements = parse_raw_log(&path, database)?;
        log::info!(
            "Read {} request timings from {:?} ({})",
            measurements.len(),
            path,
            database
        );
        for measurement in measurements {
            accumulator.add(measurement);
        }
    }

    Ok(accumulator.finish())
}

/// Build the endpoint key for a request
pub fn endpoint_key(method: &str, endpoint: &str) -> String {
    format!("{} - {}", method, endpoint)
}

/// Check whether an endpoint key is dropped from the statistics
pub fn is_excluded_endpoint(key: &str) -> bool {
    let lower = key.to_lowercase();
    EXCLUDED_ENDPOINT_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Parse one raw log into measurements
///
/// Repeated header rows and excluded endpoints produce no measurement.
pub fn parse_raw_log(path: &Path, database: DatabaseType) -> Result<Vec<Measurement>> {
    let file = File::open(path).map_err(|source| StatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| StatsError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let method_idx = column(METHOD_COLUMN)?;
    let endpoint_idx = column(ENDPOINT_COLUMN)?;
    let duration_idx = column(DURATION_COLUMN)?;

    let mut measurements = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let method = field(method_idx);
        if method.contains(METHOD_COLUMN) {
            log::debug!("Skipping repeated header at line {} of {:?}", line, path);
            continue;
        }

        let key = endpoint_key(method, field(endpoint_idx));
        if is_excluded_endpoint(&key) {
            log::trace!("Skipping excluded endpoint {:?}", key);
            continue;
        }

        let raw_duration = field(duration_idx);
        let duration_ms =
            parse_duration_strict(raw_duration).ok_or_else(|| StatsError::MalformedRow {
                path: path.to_path_buf(),
                line,
                message: format!("invalid duration {:?}", raw_duration),
            })?;

        measurements.push(Measurement {
            label: key,
            database,
            duration_ms,
        });
    }

    Ok(measurements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "method,endpoint,duration(ms)\n";

    #[test]
    fn test_endpoint_key_and_exclusions() {
        assert_eq!(endpoint_key("GET", "/orders"), "GET - /orders");
        assert!(is_excluded_endpoint("GET - /restaurantCategories"));
        assert!(is_excluded_endpoint("POST - /TEST/reset"));
        assert!(!is_excluded_endpoint("GET - /orders"));
    }

    #[test]
    fn test_averages_per_database() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("perf_mariadb.csv"),
            format!("{HEADER}GET,/orders,120ms\nGET,/orders,80ms\n"),
        )
        .unwrap();

        let stats = calculate_endpoint_stats(dir.path()).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.average("GET - /orders", DatabaseType::MariaDb), Some(100.0));
        assert_eq!(stats.average("GET - /orders", DatabaseType::MongoDb), None);
        assert_eq!(stats.average("GET - /orders", DatabaseType::MongoDbAtlas), None);
    }

    #[test]
    fn test_repeated_headers_and_excluded_endpoints_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("perf_mongodb.csv"),
            format!(
                "{HEADER}GET,/users,100\nmethod,endpoint,duration(ms)\nGET,/users,200\n\
                 GET,/productCategories,5\nPOST,/test/seed,7\n"
            ),
        )
        .unwrap();

        let stats = calculate_endpoint_stats(dir.path()).unwrap();
        assert_eq!(stats.endpoints().collect::<Vec<_>>(), vec!["GET - /users"]);
        assert_eq!(stats.average("GET - /users", DatabaseType::MongoDb), Some(150.0));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("perf_mongodb+srv.csv"),
            "timestamp,method,status,endpoint,duration(ms)\n2024-01-01,PUT,200,/orders/1,30\n",
        )
        .unwrap();

        let stats = calculate_endpoint_stats(dir.path()).unwrap();
        assert_eq!(
            stats.average("PUT - /orders/1", DatabaseType::MongoDbAtlas),
            Some(30.0)
        );
    }

    #[test]
    fn test_file_without_token_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("perf.csv"), format!("{HEADER}GET,/orders,10\n")).unwrap();

        let stats = calculate_endpoint_stats(dir.path()).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_malformed_duration_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("perf_mariadb.csv"), format!("{HEADER}GET,/orders,10\n")).unwrap();
        fs::write(dir.path().join("perf_mongodb.csv"), format!("{HEADER}GET,/orders,fast\n")).unwrap();

        let err = calculate_endpoint_stats(dir.path()).unwrap_err();
        match err {
            StatsError::MalformedRow { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_column_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("perf_mariadb.csv"), "method,endpoint\nGET,/orders\n").unwrap();

        let err = calculate_endpoint_stats(dir.path()).unwrap_err();
        assert!(matches!(err, StatsError::MissingColumn { ref column, .. } if column == "duration(ms)"));
    }
}
