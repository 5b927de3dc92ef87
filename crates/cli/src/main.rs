mod job;
mod metrics;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetline_core::{load_config, validate_config};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine config path
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("SHEETLINE_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("sheetline.toml"));

    info!(version = VERSION, "Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        lines = config.lines.len(),
        worker_threads = config.control.worker_threads,
        verify = config.output.verify,
        "Configuration loaded successfully"
    );

    // Line paths are relative to the config file
    let base_dir = config_path.parent();
    let report = job::run_job(&config, base_dir)?;

    report::write_report(&report, config.output.report_path.as_deref())?;
    info!(
        run_id = %report.run_id,
        sheets = report.total_sheets(),
        elapsed_ms = report.elapsed_ms(),
        "Run complete"
    );

    if config.output.metrics {
        eprint!("{}", metrics::encode_metrics()?);
    }

    Ok(())
}
