use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use waypoint_eval::report::{run_report, ReportConfig};

/// Draw waypoint-deviation CDFs and per-trajectory ATE RMSE charts for a set
/// of SLAM approaches
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV of `approach_name,metrics_file` rows; the first row is the primary approach
    #[arg(long = "approaches_and_metrics_file_name")]
    approaches_and_metrics_file_name: PathBuf,

    /// CSV of `error_type,save_path` rows (transl_cdf, orient_cdf); charts
    /// without a save path are displayed
    #[arg(long = "error_types_and_savepaths_file_name", default_value = "")]
    error_types_and_savepaths_file_name: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let save_paths = Some(args.error_types_and_savepaths_file_name.as_path())
        .filter(|p| !p.as_os_str().is_empty());

    run_report(
        &args.approaches_and_metrics_file_name,
        save_paths,
        ReportConfig::default(),
    )
    .with_context(|| {
        format!(
            "Failed to build report from {}",
            args.approaches_and_metrics_file_name.display()
        )
    })
}
