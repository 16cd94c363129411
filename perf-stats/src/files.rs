//! Input file discovery

use crate::types::{Result, StatsError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// List the `*.csv` files directly inside `dir`, sorted by path
///
/// A missing directory yields an empty list.
pub(crate) fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("Directory {:?} does not exist, nothing to read", dir);
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StatsError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| StatsError::DirectoryRead {
                path: dir.to_path_buf(),
                source,
            })?
            .path();

        let is_csv = path.extension().and_then(|e| e.to_str()) == Some("csv");
        if is_csv && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
