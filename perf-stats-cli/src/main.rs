//! Performance Statistics CLI
//!
//! Command-line front end for the perf-stats library:
//! - `report` aggregates raw logs and summaries into a timestamped CSV
//! - `clean` removes the raw logs of the previous capture cycle

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perf_stats::{ReportConfig, ReportGenerator};
use std::io;
use std::path::PathBuf;

mod config;

/// Aggregate e2e performance timings into a per-database report
#[derive(Parser, Debug)]
#[command(name = "perf-stats")]
#[command(about = "Aggregate e2e performance timings into a per-database CSV report", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory of raw timing logs
    #[arg(long, value_name = "DIR", global = true)]
    perf_log_dir: Option<PathBuf>,

    /// Directory of test summary files
    #[arg(long, value_name = "DIR", global = true)]
    results_dir: Option<PathBuf>,

    /// Base output file (a timestamp is inserted before the extension)
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the statistics report
    Report {
        /// Delete the raw logs before reading them
        #[arg(long)]
        clean: bool,

        /// Also print the report to stdout
        #[arg(long)]
        stdout: bool,
    },
    /// Delete every file in the raw log directory
    Clean,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("perf-stats CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using perf-stats library v{}", perf_stats::VERSION);

    let overrides = config::Overrides {
        perf_log_dir: args.perf_log_dir.clone(),
        results_log_dir: args.results_dir.clone(),
        output_path: args.output.clone(),
    };
    let config = config::resolve_config(args.config.as_deref(), overrides)?;
    log::debug!("Effective configuration: {:?}", config);

    let result = match args.command {
        Command::Report { clean, stdout } => report_mode(config, clean, stdout),
        Command::Clean => clean_mode(config),
    };

    if let Err(e) = &result {
        log::error!("Application error: {:#}", e);
    }
    result
}

/// Generate the report and optionally echo it
fn report_mode(config: ReportConfig, clean: bool, stdout: bool) -> Result<()> {
    let generator = ReportGenerator::new(config.with_clean_on_start(clean));

    let path = generator
        .generate_report()
        .context("Failed to generate performance report")?;

    if stdout {
        let report = perf_stats::Report::read_file(&path)
            .with_context(|| format!("Failed to read back report {:?}", path))?;
        report.write_to(io::stdout().lock())?;
    }

    Ok(())
}

/// Remove the raw logs of the previous run
fn clean_mode(config: ReportConfig) -> Result<()> {
    let generator = ReportGenerator::new(config.with_clean_on_start(false));
    let summary = generator.clean_logs();

    log::info!(
        "Removed {} raw log file(s) from {:?}",
        summary.deleted.len(),
        generator.config().perf_log_dir
    );
    if !summary.failed.is_empty() {
        log::warn!("{} file(s) could not be removed", summary.failed.len());
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                buf.timestamp_seconds(),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .init();
}
