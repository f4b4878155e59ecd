//! Integration tests for the caffeine binary.
//!
//! These tests verify end-to-end behavior including:
//! - Curve output in table, CSV and JSON form
//! - Point-in-time concentration queries
//! - Drink input from flags, presets and JSON files
//! - Validation failures surfacing as non-zero exits

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test directory that also serves as XDG_CONFIG_HOME
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary with config isolated to `dir`
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("caffeine"));
    cmd.env("XDG_CONFIG_HOME", dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Caffeine concentration curve and bedtime estimator",
        ));
}

#[test]
fn test_default_command_prints_curve_and_bedtime() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("--drink")
        .arg("08:00,95,15")
        .assert()
        .success()
        .stdout(predicate::str::contains("CAFFEINE CURVE"))
        .stdout(predicate::str::contains("← peak"))
        .stdout(predicate::str::contains(
            "your earliest bedtime should be 4:45 PM",
        ));
}

#[test]
fn test_no_drinks_is_not_an_error() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("curve")
        .assert()
        .success()
        .stdout(predicate::str::contains("No drinks given"));
}

#[test]
fn test_curve_json_output() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["curve", "--format", "json", "--drink", "08:00,95,15"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["safe_time"], 16.75);
    assert_eq!(value["samples"][0]["time"], 7.5);
    assert_eq!(value["samples"].as_array().unwrap().len(), 41);
}

#[test]
fn test_curve_csv_to_file() {
    let dir = setup_test_dir();
    let path = dir.path().join("exports").join("curve.csv");

    cli(&dir)
        .args(["curve", "--preset", "drip-12oz@21:00,30", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let content = fs::read_to_string(&path).expect("Failed to read CSV");
    assert!(content.starts_with("time_hrs,clock,total_mg\n20.5,20:30,"));
    // Curve runs past midnight, clock column wraps
    assert!(content.contains(",00:00,"));
}

#[test]
fn test_output_without_known_extension_needs_format() {
    let dir = setup_test_dir();
    let path = dir.path().join("curve.txt");

    cli(&dir)
        .args(["curve", "--drink", "08:00,95", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot infer export format"));
}

#[test]
fn test_at_reports_concentration() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["at", "08:00", "--drink", "08:00,95"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 mg of caffeine at 8:00 AM"));

    cli(&dir)
        .args(["at", "09:00", "--drink", "08:00,95"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mg of caffeine at 9:00 AM"))
        .stdout(predicate::str::contains("sleep threshold").not());
}

#[test]
fn test_presets_listing() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("drip-8oz"))
        .stdout(predicate::str::contains("Red Bull - 20oz"));
}

#[test]
fn test_drinks_file() {
    let dir = setup_test_dir();
    let path = dir.path().join("drinks.json");
    fs::write(
        &path,
        r#"[
  {"start_time": "08:00", "dose_mg": 95.0, "duration_hrs": 0.25},
  {"start_time": "13:00", "dose_mg": 64.0, "duration_hrs": 0.25}
]"#,
    )
    .unwrap();

    cli(&dir)
        .arg("--drinks-file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Based on 2 drinks"));
}

#[test]
fn test_invalid_time_fails() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["curve", "--drink", "08:60,95"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minutes must be in 0..60"));
}

#[test]
fn test_invalid_dose_in_file_fails() {
    let dir = setup_test_dir();
    let path = dir.path().join("drinks.json");
    fs::write(
        &path,
        r#"[{"start_time": "08:00", "dose_mg": 0.0, "duration_hrs": 0.25}]"#,
    )
    .unwrap();

    cli(&dir)
        .arg("--drinks-file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dose_mg must be positive"));
}

#[test]
fn test_weight_out_of_range_fails() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["--weight", "50", "--drink", "08:00,95"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight must be between 100 and 300"));
}

#[test]
fn test_sensitivity_and_half_life_conflict() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["--sensitivity", "2", "--half-life", "4", "--drink", "08:00,95"])
        .assert()
        .failure();
}

#[test]
fn test_profile_from_config_file() {
    let dir = setup_test_dir();
    let config_dir = dir.path().join("caffeine-curve");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[profile]\nweight_lbs = 200\nsensitivity = 5\n",
    )
    .unwrap();

    cli(&dir)
        .args(["--drink", "08:00,95"])
        .assert()
        .success()
        .stdout(predicate::str::contains("200 lbs weight, and 7 hour half-life"));
}

#[test]
fn test_explicit_config_path() {
    let dir = setup_test_dir();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[curve]\nthreshold_mg = 50.0\n").unwrap();

    cli(&dir)
        .args(["at", "20:00", "--drink", "08:00,95", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Below the 50 mg sleep threshold"));
}
