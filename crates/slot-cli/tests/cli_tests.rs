//! Integration tests for the `clinic-slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise every subcommand
//! through the actual binary against the JSON fixtures, including stdin
//! config input, exit codes and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the clinic.json fixture.
fn clinic_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/clinic.json")
}

/// Helper: path to the invalid.json fixture.
fn invalid_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid.json")
}

fn cli() -> Command {
    Command::cargo_bin("clinic-slots").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// resolve
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_split_monday_hours() {
    cli()
        .args(["-c", clinic_json_path(), "resolve", "--date", "2026-03-16"])
        .assert()
        .success()
        .stdout("09:00-12:00\n13:00-17:00\n");
}

#[test]
fn resolve_room_intersects_clinic_hours() {
    cli()
        .args(["-c", clinic_json_path(), "resolve", "-d", "2026-03-16", "-r", "R1"])
        .assert()
        .success()
        .stdout("09:00-11:00\n");
}

#[test]
fn resolve_closure_exception() {
    cli()
        .args(["-c", clinic_json_path(), "resolve", "--date", "2026-03-23"])
        .assert()
        .success()
        .stdout("closed\n");
}

#[test]
fn resolve_override_opens_friday() {
    cli()
        .args(["-c", clinic_json_path(), "resolve", "--date", "2026-03-27"])
        .assert()
        .success()
        .stdout("10:00-12:00\n");
}

#[test]
fn resolve_json_output() {
    let output = cli()
        .args(["-c", clinic_json_path(), "--json", "resolve", "--date", "2026-03-21"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"start": "2026-03-21T10:00:00", "end": "2026-03-21T14:00:00"}])
    );
}

#[test]
fn resolve_without_config_uses_fallback_hours() {
    cli()
        .args(["resolve", "--date", "2026-03-16"])
        .assert()
        .success()
        .stdout("09:00-17:00\n");

    cli()
        .args(["resolve", "--date", "2026-03-20"])
        .assert()
        .success()
        .stdout("closed\n");
}

#[test]
fn config_from_stdin() {
    let config = std::fs::read_to_string(clinic_json_path()).unwrap();

    cli()
        .args(["-c", "-", "resolve", "--date", "2026-03-21", "--room", "R1"])
        .write_stdin(config)
        .assert()
        .success()
        .stdout("10:00-12:00\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_for_room_use_config_length() {
    cli()
        .args(["-c", clinic_json_path(), "slots", "--date", "2026-03-21", "--room", "R1"])
        .assert()
        .success()
        .stdout("10:00-10:30\n10:30-11:00\n11:00-11:30\n11:30-12:00\n");
}

#[test]
fn slots_in_clinic_timezone() {
    let output = cli()
        .args(["-c", clinic_json_path(), "slots", "--date", "2026-03-21", "--utc"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "2026-03-21T10:00:00-04:00/2026-03-21T10:30:00-04:00");
}

#[test]
fn skip_dst_gaps_requires_utc() {
    cli()
        .args([
            "-c",
            clinic_json_path(),
            "slots",
            "--date",
            "2026-03-21",
            "--skip-dst-gaps",
        ])
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// blackout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn blackout_covers_gaps_until_midnight() {
    cli()
        .args(["-c", clinic_json_path(), "blackout", "--date", "2026-03-16"])
        .assert()
        .success()
        .stdout("00:00-09:00\n12:00-13:00\n17:00-24:00\n");
}

#[test]
fn blackout_closed_day_is_whole_day() {
    cli()
        .args(["-c", clinic_json_path(), "blackout", "--date", "2026-03-20"])
        .assert()
        .success()
        .stdout("00:00-24:00\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_accepts_contained_appointment() {
    cli()
        .args([
            "-c",
            clinic_json_path(),
            "check",
            "--start",
            "2026-03-16T09:00",
            "--end",
            "2026-03-16T09:30",
        ])
        .assert()
        .success()
        .stdout("available\n");
}

#[test]
fn check_rejects_appointment_over_lunch() {
    cli()
        .args([
            "-c",
            clinic_json_path(),
            "check",
            "--start",
            "2026-03-16T11:30",
            "--end",
            "2026-03-16T13:30",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("rejected:"));
}

#[test]
fn check_json_includes_reason() {
    let output = cli()
        .args([
            "-c",
            clinic_json_path(),
            "--json",
            "check",
            "--start",
            "2026-03-16T14:00:00",
            "--end",
            "2026-03-16T15:00:00",
            "--room",
            "R1",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["available"], false);
    assert!(value["reason"].as_str().unwrap().contains("room R1"));
}

#[test]
fn check_rejects_malformed_datetime() {
    cli()
        .args(["check", "--start", "tomorrow", "--end", "2026-03-16T10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DDTHH:MM"));
}

// ─────────────────────────────────────────────────────────────────────────────
// validate / default-config
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_clean_config() {
    cli()
        .args(["-c", clinic_json_path(), "validate"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn validate_reports_every_issue() {
    cli()
        .args(["-c", invalid_json_path(), "validate"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown timezone: Atlantis/Capital"))
        .stdout(predicate::str::contains(
            "clinic.mon: 09:00-12:00 overlaps 11:00-13:00",
        ))
        .stdout(predicate::str::contains("duplicate exception for 2026-03-23"));
}

#[test]
fn default_config_roundtrips_through_validate() {
    let output = cli().arg("default-config").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["slotMinutes"], 15);
    assert_eq!(value["clinic"]["sat"][0]["start"], "10:00");
    assert_eq!(value["clinic"]["fri"], serde_json::json!([]));

    cli()
        .args(["-c", "-", "validate"])
        .write_stdin(output.stdout)
        .assert()
        .success()
        .stdout("ok\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_config_file_is_an_error() {
    cli()
        .args(["-c", "/nonexistent/clinic.json", "resolve", "--date", "2026-03-16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn unparseable_config_is_an_error() {
    cli()
        .args(["-c", "-", "resolve", "--date", "2026-03-16"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse availability config"));
}

#[test]
fn bad_date_is_rejected_by_argument_parsing() {
    cli()
        .args(["resolve", "--date", "16/03/2026"])
        .assert()
        .failure();
}
