//! Raw log cleanup
//!
//! Each report run is meant to cover exactly one capture cycle, so stale
//! raw logs from the previous run are removed before new ones are written.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of a cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Files that were removed
    pub deleted: Vec<PathBuf>,
    /// Files that could not be removed
    pub failed: Vec<PathBuf>,
}

/// Delete every file in `dir`, best-effort
///
/// Failures are logged and recorded in the summary, never returned as errors.
/// Subdirectories are left in place and a missing directory is a no-op.
pub fn clean_log_dir(dir: &Path) -> CleanupSummary {
    let mut summary = CleanupSummary::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return summary,
        Err(e) => {
            log::warn!("Failed to list {:?}: {}", dir, e);
            return summary;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted log file: {:?}", path);
                summary.deleted.push(path);
            }
            Err(e) => {
                log::warn!("Failed to delete {:?}: {}", path, e);
                summary.failed.push(path);
            }
        }
    }

    summary
}
