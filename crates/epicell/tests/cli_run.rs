use std::ffi::OsString;
use std::path::Path;

use clap::Parser;
use epicell::cli::{run, Args};
use epicell::prelude::*;
use epicell_test_utils::{scenario_a, scenario_b, ScenarioBuilder};
use serde_json::json;

fn args(config: &Path, duration: &str, output: &Path) -> Args {
    let argv: Vec<OsString> = vec![
        "epicell".into(),
        config.into(),
        duration.into(),
        "--output".into(),
        output.into(),
    ];
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn discrete_scenario_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("a.json");
    let output = dir.path().join("a.csv");
    std::fs::write(&config, scenario_a().to_json()).unwrap();

    let report = run(&args(&config, "1", &output)).unwrap();
    assert_eq!(report.mode, NumericMode::Discrete);
    assert_eq!(report.rows, 2);
    assert_eq!(report.summary.final_time, 1.0);

    let text = std::fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(rows, ["0;0;X;;<990,0,10,0>", "1;0;X;;<990,0,9,1>"]);
}

#[test]
fn continuous_scenario_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("b.json");
    let output = dir.path().join("b.csv");
    std::fs::write(&config, scenario_b().to_json()).unwrap();

    let report = run(&args(&config, "1", &output)).unwrap();
    assert_eq!(report.mode, NumericMode::Continuous);

    let file = std::io::BufReader::new(std::fs::File::open(&output).unwrap());
    let rows: Vec<_> = epicell::log::CsvStateReader::open(file)
        .unwrap()
        .rows()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.len() as u64, report.rows);
    let last_b = rows.iter().rev().find(|r| r.cell.as_str() == "B").unwrap();
    assert_eq!(last_b.time, 1.0);
    assert_eq!(last_b.state, CompartmentState::new(99.5, 0.5, 0.0, 0.0));
}

#[test]
fn unknown_model_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.json");
    let output = dir.path().join("bad.csv");
    let doc = ScenarioBuilder::new()
        .cell(
            "A",
            json!({ "model": "ZikaCell", "state": ScenarioBuilder::state([1.0, 0.0, 0.0, 0.0]) }),
        )
        .to_json();
    std::fs::write(&config, doc).unwrap();

    let err = run(&args(&config, "10", &output)).unwrap_err();
    assert!(format!("{err:#}").contains("unknown cell model 'ZikaCell'"));
    assert!(!output.exists());
}

#[test]
fn unloggable_id_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sep.json");
    let output = dir.path().join("sep.csv");
    let doc = ScenarioBuilder::new()
        .numeric("discrete")
        .cell(
            "a;b",
            ScenarioBuilder::seir_cell([990.0, 0.0, 10.0, 0.0], 0.0, 0.2, 0.1),
        )
        .to_json();
    std::fs::write(&config, doc).unwrap();

    let err = run(&args(&config, "5", &output)).unwrap_err();
    assert!(format!("{err:#}").contains("'a;b'"));
    assert!(!output.exists());
}

#[test]
fn missing_config_file_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("absent.json");
    let output = dir.path().join("out.csv");
    let err = run(&args(&config, "10", &output)).unwrap_err();
    assert!(err.to_string().starts_with("loading scenario"));
    assert!(!output.exists());
}

#[test]
fn workers_flag_overrides_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("grid.json");
    let doc = ScenarioBuilder::new()
        .numeric("discrete")
        .grid(4, 4, "wrap", json!({ "type": "moore" }))
        .default_cell(ScenarioBuilder::seir_cell([50.0, 0.0, 0.0, 0.0], 0.05, 0.5, 0.25))
        .cell("(0,0)", json!({ "state": { "I": 10 } }))
        .to_json();
    std::fs::write(&config, doc).unwrap();

    let serial = dir.path().join("serial.csv");
    let parallel = dir.path().join("parallel.csv");
    run(&args(&config, "20", &serial)).unwrap();
    let mut par_args = args(&config, "20", &parallel);
    par_args.workers = Some(3);
    run(&par_args).unwrap();

    assert_eq!(
        std::fs::read_to_string(&serial).unwrap(),
        std::fs::read_to_string(&parallel).unwrap()
    );
}
