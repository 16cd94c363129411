//! Configuration loading and command-line overrides

use anyhow::{Context, Result};
use perf_stats::ReportConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub perf_log_dir: Option<PathBuf>,
    pub results_log_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<ReportConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: ReportConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Resolve the effective configuration: flags over file over defaults
pub fn resolve_config(file: Option<&Path>, overrides: Overrides) -> Result<ReportConfig> {
    let mut config = match file {
        Some(path) => load_config(path)?,
        None => ReportConfig::default(),
    };

    if let Some(dir) = overrides.perf_log_dir {
        config = config.with_perf_log_dir(dir);
    }
    if let Some(dir) = overrides.results_log_dir {
        config = config.with_results_log_dir(dir);
    }
    if let Some(path) = overrides.output_path {
        config = config.with_output_path(path);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            perf_log_dir = "logs"
            output_path = "reports/stats.csv"
            clean_on_start = false
        "#;

        let config: ReportConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.perf_log_dir, PathBuf::from("logs"));
        assert_eq!(config.results_log_dir, PathBuf::from("tests/e2e/results"));
        assert_eq!(config.output_path, PathBuf::from("reports/stats.csv"));
        assert!(!config.clean_on_start);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perf-stats.toml");
        fs::write(&path, "perf_log_dir = \"from-file\"\nresults_log_dir = \"results\"\n").unwrap();

        let overrides = Overrides {
            perf_log_dir: Some(PathBuf::from("from-flag")),
            ..Default::default()
        };
        let config = resolve_config(Some(&path), overrides).unwrap();
        assert_eq!(config.perf_log_dir, PathBuf::from("from-flag"));
        assert_eq!(config.results_log_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_config(Some(&dir.path().join("absent.toml")), Overrides::default());
        assert!(result.is_err());
    }
}
