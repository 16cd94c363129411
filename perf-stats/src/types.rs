//! Core types for the performance statistics library
//!
//! This module defines the database backends a measurement can belong to,
//! the ephemeral measurement record produced while parsing, the report row
//! shape shared by scope and endpoint statistics, and the library error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Result type for library operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Database backend a log file was captured against
///
/// Variants are declared in matching order: `mongodb+srv` must be tried
/// before `mongodb`, otherwise every Atlas file would classify as plain MongoDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    /// MongoDB Atlas (`mongodb+srv` connection strings)
    #[serde(rename = "mongodb+srv")]
    MongoDbAtlas,
    /// Self-hosted MongoDB
    #[serde(rename = "mongodb")]
    MongoDb,
    /// MariaDB through Sequelize
    #[serde(rename = "mariadb")]
    MariaDb,
}

impl DatabaseType {
    /// All database types in declared (matching and column) order
    pub const ALL: [DatabaseType; 3] = [
        DatabaseType::MongoDbAtlas,
        DatabaseType::MongoDb,
        DatabaseType::MariaDb,
    ];

    /// Filename token identifying this database
    pub fn token(&self) -> &'static str {
        match self {
            DatabaseType::MongoDbAtlas => "mongodb+srv",
            DatabaseType::MongoDb => "mongodb",
            DatabaseType::MariaDb => "mariadb",
        }
    }

    /// Look up a database type by its exact token
    pub fn from_token(token: &str) -> Option<DatabaseType> {
        Self::ALL.into_iter().find(|db| db.token() == token)
    }

    /// Classify a filename stem by substring or suffix match
    ///
    /// Tokens are tried in declared order and the first match wins.
    pub fn from_file_stem(stem: &str) -> Option<DatabaseType> {
        Self::ALL
            .into_iter()
            .find(|db| stem.contains(db.token()) || stem.ends_with(db.token()))
    }

    /// Classify a file path by its stem
    pub fn classify_path(path: &Path) -> Result<DatabaseType> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(Self::from_file_stem)
            .ok_or_else(|| StatsError::NoDatabaseToken(path.to_path_buf()))
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A single timing observation
///
/// Created while parsing a raw log or summary file and discarded once it has
/// been folded into the aggregate tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Scope name or endpoint key (`"GET - /orders"`)
    pub label: String,
    /// Backend the measurement was captured against
    pub database: DatabaseType,
    /// Observed duration in milliseconds
    pub duration_ms: f64,
}

/// One row of the final report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportRow {
    /// Scope name or endpoint key
    pub label: String,
    /// Value per database, in `DatabaseType::ALL` order
    values: [Option<f64>; 3],
}

impl ReportRow {
    /// Create an empty row for a label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: [None; 3],
        }
    }

    /// Builder method: set the value of a database column
    pub fn with_value(mut self, database: DatabaseType, value: f64) -> Self {
        self.set(database, value);
        self
    }

    /// Set (or overwrite) the value of a database column
    pub fn set(&mut self, database: DatabaseType, value: f64) {
        self.values[column_index(database)] = Some(value);
    }

    /// Value of a database column, if any measurement exists
    pub fn get(&self, database: DatabaseType) -> Option<f64> {
        self.values[column_index(database)]
    }

    /// Iterate over `(database, value)` pairs in column order
    pub fn values(&self) -> impl Iterator<Item = (DatabaseType, Option<f64>)> + '_ {
        DatabaseType::ALL.into_iter().zip(self.values.iter().copied())
    }
}

fn column_index(database: DatabaseType) -> usize {
    match database {
        DatabaseType::MongoDbAtlas => 0,
        DatabaseType::MongoDb => 1,
        DatabaseType::MariaDb => 2,
    }
}

/// Errors that can occur while aggregating statistics
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Failed to read directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed row {line} in {path:?}: {message}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("No database token found in filename {0:?}")]
    NoDatabaseToken(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write report {path:?}: {message}")]
    ReportWrite { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
