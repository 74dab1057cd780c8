//! `epicell <CONFIG> [DURATION] [--output PATH] [--workers N]`
//!
//! Runs a scenario and writes its state log. Set `RUST_LOG` to change
//! the log level (default `info`).

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use epicell::cli::{run, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let report = run(&args)?;
    info!(
        mode = %report.mode,
        steps = report.summary.steps,
        evaluations = report.summary.evaluations,
        changes = report.summary.changes,
        "simulation finished"
    );
    Ok(())
}
