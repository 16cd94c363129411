//! Report assembly and CSV serialization
//!
//! The report is a single table: a `scope` column followed by one column per
//! database in `DatabaseType::ALL` order. Scope rows come first, endpoint rows
//! after them. An empty cell means no data for that database.

use crate::endpoint_stats::EndpointStats;
use crate::types::{DatabaseType, ReportRow, Result, StatsError};
use chrono::{DateTime, TimeZone};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Name of the label column
pub const LABEL_COLUMN: &str = "scope";

/// Timestamp inserted into output filenames
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// The assembled statistics table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Create a report from rows that are already in order
    pub fn from_rows(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    /// Concatenate ordered scope rows with endpoint rows
    pub fn assemble(scope_rows: Vec<ReportRow>, endpoints: EndpointStats) -> Self {
        let mut rows = scope_rows;
        rows.extend(endpoints.into_rows());
        Self { rows }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Find a row by label
    pub fn row(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// Header record: `scope` followed by every database token
    pub fn header() -> Vec<&'static str> {
        std::iter::once(LABEL_COLUMN)
            .chain(DatabaseType::ALL.iter().map(|db| db.token()))
            .collect()
    }

    /// Serialize the report as CSV into any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().from_writer(writer);

        wtr.write_record(Self::header())?;
        for row in &self.rows {
            let record: Vec<String> = std::iter::once(row.label.clone())
                .chain(row.values().map(|(_, value)| format_value(value)))
                .collect();
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the report to `path`, creating parent directories as needed
    pub fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StatsError::ReportWrite {
                path: path.to_path_buf(),
                message: format!("cannot create directory {:?}: {}", parent, e),
            })?;
        }

        let file = File::create(path).map_err(|e| StatsError::ReportWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.write_to(file)
    }

    /// Read a report previously written by [`Report::write_to`]
    pub fn read_from<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.get(0) != Some(LABEL_COLUMN) {
            return Err(StatsError::MissingColumn {
                path: source.to_path_buf(),
                column: LABEL_COLUMN.to_string(),
            });
        }

        let mut columns = Vec::new();
        for (idx, name) in headers.iter().enumerate().skip(1) {
            match DatabaseType::from_token(name) {
                Some(db) => columns.push((idx, db)),
                None => log::warn!("Ignoring unknown report column {:?} in {:?}", name, source),
            }
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let mut row = ReportRow::new(record.get(0).unwrap_or(""));

            for &(idx, db) in &columns {
                let cell = record.get(idx).unwrap_or("").trim();
                if cell.is_empty() {
                    continue;
                }
                let value = cell.parse::<f64>().map_err(|e| StatsError::MalformedRow {
                    path: source.to_path_buf(),
                    line,
                    message: format!("column {}: {}", db, e),
                })?;
                row.set(db, value);
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// Read a report file
    pub fn read_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| StatsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_from(file, path)
    }
}

/// Format a cell; whole numbers keep one decimal place (`45.0`)
fn format_value(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.1}", v),
        Some(v) => v.to_string(),
    }
}

/// Insert `_<timestamp>` before the extension of `base`
///
/// `stats/stats.csv` at 2024-03-05 14:07 becomes `stats/stats_2024-03-05_14-07.csv`.
pub fn timestamped_path<Tz: TimeZone>(base: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}_{}", stem, now.format(TIMESTAMP_FORMAT));
    if let Some(ext) = base.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    base.with_file_name(name)
}
