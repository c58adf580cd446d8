//! Integration tests for the pitchseq binary
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Two outs and two reaches, pitch rows deliberately out of order
const PITCH_LOG: &str = r#"[
    {"at_bat_id": "1", "pitch_number": 2, "pitch_type": "SL", "description": "hit_into_play", "events": "field_out"},
    {"at_bat_id": "1", "pitch_number": 1, "pitch_type": "SI", "description": "ball"},
    {"at_bat_id": "2", "pitch_number": 1, "pitch_type": "SI", "description": "hit_into_play", "events": "single"},
    {"at_bat_id": "3", "pitch_number": 1, "pitch_type": "SI", "description": "ball"},
    {"at_bat_id": "3", "pitch_number": 2, "pitch_type": "SI", "description": "ball", "events": "walk"},
    {"at_bat_id": "4", "pitch_number": 1, "pitch_type": "SL", "description": "called_strike"},
    {"at_bat_id": "4", "pitch_number": 2, "pitch_type": "SL", "description": "swinging_strike", "events": "strikeout"},
    {"at_bat_id": "5", "pitch_number": 1, "pitch_type": "CH", "description": "ball", "events": "caught_stealing_2b"}
]"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_text_report_default() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TRANSITION PROBABILITY COMPARISON"))
        .stdout(predicate::str::contains("Out cases: 2"))
        .stdout(predicate::str::contains("Reach cases: 2"))
        .stdout(predicate::str::contains("Overall MSE"));
}

#[test]
fn test_json_output_parses() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format").arg("json").arg(log.path());

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["format"], "pitchseq-json-v1");
    assert_eq!(parsed["summary"]["other_cases"], 1);
    assert_eq!(parsed["out"]["cases"], 2);
    assert_eq!(parsed["out"]["probabilities"]["start"]["SI - ball"], 0.5);
    assert_eq!(parsed["out"]["probabilities"]["start"]["SL - strike"], 0.5);
    assert_eq!(parsed["reach"]["counts"]["SI - ball"]["SI - ball"], 1);
    assert!(parsed["comparison"]["overall_mse"].is_number());
    assert!(parsed.get("saber").is_none());
}

#[test]
fn test_json_with_saber() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format").arg("json").arg("--saber").arg(log.path());

    let output = cmd.output().unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(parsed["saber"]["pitches"], 8);
    assert_eq!(parsed["saber"]["components"]["plate_appearances"], 5);
    assert_eq!(parsed["saber"]["components"]["strikeouts"], 1);
}

#[test]
fn test_csv_output() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format").arg("csv").arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "population,from,to,count,probability\n",
        ))
        .stdout(predicate::str::contains("out,start,SI - ball,1,0.500000"))
        .stdout(predicate::str::contains("reach,SI - in_play,end,1,1.000000"));
}

#[test]
fn test_no_sentinels() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format")
        .arg("csv")
        .arg("--no-sentinels")
        .arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("start").not())
        .stdout(predicate::str::contains("out,SI - ball,SL - in_play,1"));
}

#[test]
fn test_custom_sentinel_labels() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format")
        .arg("csv")
        .arg("--start-label")
        .arg("BEGIN")
        .arg("--end-label")
        .arg("END")
        .arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("out,BEGIN,SI - ball"))
        .stdout(predicate::str::contains(",END,"));
}

#[test]
fn test_exclude_pitch_type() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format")
        .arg("csv")
        .arg(log.path())
        .arg("--exclude-pitch")
        .arg("SL");

    // At-bat 4 is all sliders and is dropped; at-bat 1 keeps its sinker
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SL").not())
        .stdout(predicate::str::contains("out,start,SI - ball,1,1.000000"));
}

#[test]
fn test_config_file_applied() {
    let log = write_temp(PITCH_LOG);
    let config = write_temp("min_report_probability = 0.75\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format")
        .arg("csv")
        .arg("--config")
        .arg(config.path())
        .arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("out,start,SI - ball").not())
        .stdout(predicate::str::contains("out,SI - ball,SL - in_play,1,1.000000"));
}

#[test]
fn test_invalid_top_k_rejected() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--top-k").arg("0").arg(log.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("report_top_k must be >= 1"));
}

#[test]
fn test_missing_population_is_error() {
    let log = write_temp(
        r#"[{"at_bat_id": "1", "pitch_number": 1, "pitch_type": "SI", "description": "swinging_strike", "events": "strikeout"}]"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg(log.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No at-bats ended with the batter on base"))
        .stderr(predicate::str::contains("Event log is empty"));
}

#[test]
fn test_missing_input_file() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("/nonexistent/pitches.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read pitch log"));
}

#[test]
fn test_malformed_input_file() {
    let log = write_temp("{\"at_bat_id\": 1");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg(log.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pitch log"));
}

#[test]
fn test_saber_text_section() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--saber").arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Sabermetrics"))
        .stdout(predicate::str::contains("P/PA: 1.600"));
}

#[test]
fn test_exclude_pitch_before_input() {
    let log = write_temp(PITCH_LOG);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format")
        .arg("csv")
        .arg("--exclude-pitch")
        .arg("SL,CH")
        .arg(log.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SL").not())
        .stdout(predicate::str::contains("out,start,SI - ball,1,1.000000"));
}

#[test]
fn test_saber_skips_at_bats_missing_pitch_type() {
    let log = write_temp(
        r#"[
        {"at_bat_id": "1", "pitch_number": 1, "description": "swinging_strike", "events": "strikeout"},
        {"at_bat_id": "2", "pitch_number": 1, "pitch_type": "SI", "description": "hit_into_play", "events": "single"},
        {"at_bat_id": "3", "pitch_number": 1, "pitch_type": "SL", "description": "hit_into_play", "events": "field_out"}
    ]"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pitchseq");
    cmd.arg("--format").arg("json").arg("--saber").arg(log.path());

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["dropped_cases"], 1);
    assert_eq!(parsed["saber"]["pitches"], 2);
    assert_eq!(parsed["saber"]["components"]["plate_appearances"], 2);
    assert_eq!(parsed["saber"]["components"]["strikeouts"], 0);
    assert_eq!(parsed["saber"]["strikeouts_per_pa"], 0.0);
}
