//! End-to-end runs of the `catdist` binary against a cache on disk.

use std::path::Path;
use std::process::{Command, Output};

fn cache_text(budget_per_variable: usize) -> String {
    format!(
        "\
Variable types: ( I I I R )
Number of cat, int and cont: 2 1 1
Lower bounds: ( 0 0 -3 0 )
Upper bounds: ( 1 3 3 1 )
Current step: POLL
Current frame (poll) or feasible (search) : ( 0 2 1 0.25 )
Current frame (poll) or infeasible (search): ( - - - - )
Best current function values: 0.5 - -
Nb of cat neighbors: 3
Seed: 7
Budget per variables: {budget_per_variable}
( 0 2 1 0.25 ) BB_EVAL_OK ( 0.5 )
( 1 0 -2 0.75 ) BB_EVAL_OK ( 2.5 )
( 1 3 0 0.1 ) BB_EVAL_OK ( 1.7 )
( 0 0 3 0.9 ) BB_EVAL_OK ( 0.9 )
( 0 1 -1 0.5 ) EVAL_FAILED ( - )
( 1 1 2 0.3 ) BB_EVAL_OK ( 2.1 )
( 0 3 -3 0.6 ) BB_EVAL_OK ( 1.1 )
( 1 2 1 0.2 ) BB_EVAL_OK ( 2.9 )
( 0 2 0 0.4 ) BB_EVAL_OK ( 0.6 )
"
    )
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("catdist.toml");
    let text = format!(
        "[io]\ncache = {:?}\nparams = {:?}\ndirections = {:?}\n\n[calibration]\nbudget_per_param = 5\n",
        dir.join("cachePts.txt"),
        dir.join("params.json"),
        dir.join("catDirections.txt"),
    );
    std::fs::write(&path, text).expect("write config");
    path
}

fn catdist(args: &[&str], config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_catdist"))
        .args(args)
        .arg("--config")
        .arg(config)
        .output()
        .expect("run catdist")
}

#[test]
fn calibrate_then_propose_neighbors() {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join("cachePts.txt"), cache_text(50)).expect("write cache");
    let config = write_config(dir.path());

    let out = catdist(&["calibrate"], &config);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("params.json").exists());

    let out = catdist(&["neighbors"], &config);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));

    let text = std::fs::read_to_string(dir.path().join("catDirections.txt")).expect("directions");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in &lines {
        assert!(line.starts_with('(') && line.ends_with(')'));
        assert!(line.ends_with(" 0 0.000000)"), "quantitative part moved: {line}");
        assert_ne!(*line, "(0 0 0 0.000000)");
    }
}

#[test]
fn calibrate_reports_exhausted_recalibration_budget() {
    let dir = tempfile::tempdir().expect("create temp dir");
    // 8 successful evaluations against 2 × 4 = 8 total budget
    std::fs::write(dir.path().join("cachePts.txt"), cache_text(2)).expect("write cache");
    let config = write_config(dir.path());

    let out = catdist(&["calibrate"], &config);
    assert_eq!(out.status.code(), Some(1), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.path().join("params.json").exists());
}

#[test]
fn neighbors_without_params_fails() {
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join("cachePts.txt"), cache_text(50)).expect("write cache");
    let config = write_config(dir.path());

    let out = catdist(&["neighbors"], &config);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("Error:"), "{stderr}");
    assert!(!dir.path().join("catDirections.txt").exists());
}

#[test]
fn missing_cache_fails() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = write_config(dir.path());

    let out = catdist(&["calibrate"], &config);
    assert_eq!(out.status.code(), Some(2));
    assert!(!dir.path().join("params.json").exists());
}
