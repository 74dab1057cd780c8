//! The `epicell` command-line runner.
//!
//! Loads a scenario file, builds its cell network, runs it until the
//! requested time, and writes every published state to a log file.
//! The network is fully built before the output file is created, so a
//! bad configuration never leaves a partial log behind.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use epicell_config::Scenario;
use epicell_core::{NumericMode, Population};
use epicell_engine::RunSummary;
use epicell_log::CsvStateLogger;
use epicell_models::ModelRegistry;

/// Simulated time to run for when none is given.
pub const DEFAULT_DURATION: f64 = 1000.0;

/// Log path used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "epicell_output.csv";

/// Run an SEIR cell network and log every published state.
#[derive(Clone, Debug, Parser)]
#[command(name = "epicell", version, about)]
pub struct Args {
    /// Scenario configuration file (JSON).
    pub config: PathBuf,

    /// Simulated time to run until.
    #[arg(default_value_t = DEFAULT_DURATION, value_parser = parse_duration)]
    pub duration: f64,

    /// Path of the state log to write.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Evaluation worker threads; overrides the scenario's `workers`.
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// What a completed run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Numeric representation the scenario ran with.
    pub mode: NumericMode,
    /// Scheduler totals.
    pub summary: RunSummary,
    /// Rows written to the log, including the initial states.
    pub rows: u64,
    /// Where the log was written.
    pub output: PathBuf,
}

/// Load, build, run, and log.
///
/// # Errors
///
/// Fails if the scenario cannot be read or built, or if the log cannot
/// be written. Build failures are reported before the log file exists.
pub fn run(args: &Args) -> Result<RunReport> {
    let mut scenario = Scenario::from_file(&args.config)
        .with_context(|| format!("loading scenario {}", args.config.display()))?;
    if let Some(workers) = args.workers {
        scenario = scenario.with_workers(workers);
    }
    match scenario.numeric() {
        NumericMode::Continuous => simulate::<f64>(&scenario, args),
        NumericMode::Discrete => simulate::<i64>(&scenario, args),
    }
}

fn simulate<P: Population>(scenario: &Scenario, args: &Args) -> Result<RunReport> {
    let registry = ModelRegistry::<P>::with_defaults();
    let mut network = scenario
        .build_network(&registry)
        .with_context(|| format!("building cell network from {}", args.config.display()))?;
    epicell_log::check_ids(network.cell_ids())
        .with_context(|| format!("building cell network from {}", args.config.display()))?;

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut log = CsvStateLogger::new(BufWriter::new(file))
        .with_context(|| format!("writing {}", args.output.display()))?;

    network.emit_initial(&mut log);
    let summary = network.run_until(args.duration, &mut log);
    let rows = log.rows_written();
    log.finish()
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        rows,
        final_time = summary.final_time,
        "state log written"
    );
    Ok(RunReport {
        mode: P::MODE,
        summary,
        rows,
        output: args.output.clone(),
    })
}

fn parse_duration(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("duration must be finite and non-negative, got {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let args = Args::try_parse_from(["epicell", "city.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("city.json"));
        assert_eq!(args.duration, DEFAULT_DURATION);
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(args.workers, None);
    }

    #[test]
    fn all_arguments() {
        let args = Args::try_parse_from([
            "epicell", "city.json", "30", "--output", "out.csv", "-w", "4",
        ])
        .unwrap();
        assert_eq!(args.duration, 30.0);
        assert_eq!(args.output, PathBuf::from("out.csv"));
        assert_eq!(args.workers, Some(4));
    }

    #[test]
    fn missing_config_is_usage_error() {
        let err = Args::try_parse_from(["epicell"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn bad_durations_rejected() {
        for d in ["soon", "-1", "inf", "NaN"] {
            assert!(
                Args::try_parse_from(["epicell", "city.json", d]).is_err(),
                "{d}"
            );
        }
    }
}
