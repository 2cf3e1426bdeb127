//! Integration tests for the `shifts` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run every subcommand
//! through the actual binary, covering stdin and file input, role presets,
//! config files, exit codes and the JSON verdicts on stdout.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: absolute path to a file under tests/fixtures.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: the `shifts` binary.
fn shifts() -> Command {
    Command::cargo_bin("shifts").unwrap()
}

/// Helper: parse captured stdout as JSON.
fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// validate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_stdin_normalizes_days() {
    let input = r#"[{"checkIn":"08:00","checkOut":"12:00","days":["Wednesday","monday"]}]"#;

    let output = shifts()
        .arg("validate")
        .write_stdin(input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json[0]["checkIn"], "08:00");
    assert_eq!(json[0]["days"], serde_json::json!(["monday", "wednesday"]));
}

#[test]
fn validate_reports_index_and_field() {
    let input = r#"[
        {"checkIn":"08:00","checkOut":"12:00","days":["monday"]},
        {"checkIn":"8:00","checkOut":"12:00","days":["monday"]}
    ]"#;

    let output = shifts()
        .arg("validate")
        .write_stdin(input)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "invalidShift");
    assert_eq!(json["index"], 1);
    assert_eq!(json["reason"]["kind"], "invalidTimeFormat");
    assert_eq!(json["reason"]["field"], "checkIn");
}

#[test]
fn validate_invalid_json_exits_2() {
    shifts()
        .arg("validate")
        .write_stdin("not json {{{")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid JSON in stdin"));
}

#[test]
fn validate_quarter_hour_needs_assistant_grid() {
    let input = r#"[{"checkIn":"08:15","checkOut":"12:00","days":["monday"]}]"#;

    shifts()
        .arg("validate")
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalidTimeFormat"));

    shifts()
        .args(["--role", "assistant", "validate"])
        .write_stdin(input)
        .assert()
        .success();

    shifts()
        .args(["--config", &fixture("quarter_hour.json"), "validate"])
        .write_stdin(input)
        .assert()
        .success();
}

#[test]
fn unknown_role_is_a_usage_error() {
    shifts()
        .args(["--role", "nurse", "validate"])
        .write_stdin("[]")
        .assert()
        .code(2);
}

#[test]
fn missing_config_file_exits_2() {
    shifts()
        .args(["--config", "/nonexistent/shifts-config.json", "validate"])
        .write_stdin("[]")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn invalid_config_is_rejected() {
    let path = std::env::temp_dir().join("shifts-test-bad-grid.json");
    std::fs::write(&path, r#"{"timeGridMinutes": 7}"#).unwrap();

    shifts()
        .args(["--config", path.to_str().unwrap(), "validate"])
        .write_stdin("[]")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid engine configuration"));

    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_overlap_names_stored_shift() {
    let output = shifts()
        .args([
            "check",
            "-i",
            &fixture("overlapping.json"),
            "--existing",
            &fixture("stored.json"),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "overlapConflict");
    assert_eq!(json["with"]["source"], "existing");
    assert_eq!(json["with"]["id"], 1);
}

#[test]
fn check_compatible_shifts_are_valid() {
    // 12:00-14:00 monday starts where the stored 08:00-12:00 ends
    shifts()
        .args([
            "check",
            "-i",
            &fixture("compatible.json"),
            "--existing",
            &fixture("stored.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\""));
}

#[test]
fn check_duplicate_from_stdin() {
    let input = r#"[{"checkIn":"14:00","checkOut":"18:00","days":["friday"]}]"#;

    let output = shifts()
        .args(["check", "--existing", &fixture("stored.json")])
        .write_stdin(input)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "duplicateConflict");
    assert_eq!(json["with"]["id"], 2);
}

#[test]
fn check_missing_existing_file_exits_2() {
    shifts()
        .args(["check", "--existing", "/nonexistent/stored.json"])
        .write_stdin("[]")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// update / remove
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn update_same_values_is_no_change() {
    let input = r#"{"checkIn":"08:00","checkOut":"12:00","days":["wednesday","monday"]}"#;

    shifts()
        .args(["update", "--id", "1", "--existing", &fixture("stored.json")])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("noChanges"));
}

#[test]
fn update_into_other_shift_conflicts() {
    let input = r#"{"checkIn":"13:00","checkOut":"15:00","days":["friday"]}"#;

    let output = shifts()
        .args(["update", "--id", "1", "--existing", &fixture("stored.json")])
        .write_stdin(input)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "overlapConflict");
    assert_eq!(json["with"]["id"], 2);
}

#[test]
fn update_with_numeric_looking_string_id_excludes_itself() {
    // Stored ids are the strings "1" and "42"
    let input = r#"{"checkIn":"09:00","checkOut":"12:00","days":["monday"]}"#;

    shifts()
        .args(["update", "--id", "1", "--existing", &fixture("string_ids.json")])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\""));
}

#[test]
fn remove_with_numeric_looking_string_id_finds_the_row() {
    shifts()
        .args(["remove", "--id", "42", "--existing", &fixture("string_ids.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\""));

    shifts()
        .args(["remove", "--id", "7", "--existing", &fixture("string_ids.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("noChanges"));
}

#[test]
fn update_patch_changes_one_field() {
    // Only the check-out moves; times and days come from stored shift 1
    let output = shifts()
        .args(["update", "--id", "1", "--existing", &fixture("stored.json")])
        .write_stdin(r#"{"checkOut":"13:00"}"#)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["verdict"], "valid");
}

#[test]
fn update_patch_into_sibling_conflicts() {
    // Moving shift 1 (08:00-12:00) to friday, where shift 2 runs 14:00-18:00
    let output = shifts()
        .args(["update", "--id", "1", "--existing", &fixture("stored.json")])
        .write_stdin(r#"{"checkOut":"15:00","days":["friday"]}"#)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "overlapConflict");
    assert_eq!(json["candidate"]["checkIn"], "08:00");
    assert_eq!(json["with"]["id"], 2);
}

#[test]
fn update_patch_for_unknown_id_reports_missing_field() {
    let output = shifts()
        .args(["update", "--id", "99", "--existing", &fixture("stored.json")])
        .write_stdin(r#"{"checkOut":"13:00"}"#)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["reason"]["kind"], "missingField");
    assert_eq!(json["reason"]["field"], "checkIn");
}

#[test]
fn partial_config_keeps_role_preset() {
    // The file sets only the grid; the assistant's bulk clear still applies
    shifts()
        .args([
            "--role",
            "assistant",
            "--config",
            &fixture("half_hour.json"),
            "remove",
            "--id",
            "abc",
            "--existing",
            &fixture("single.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\""));

    shifts()
        .args(["--role", "assistant", "--config", &fixture("half_hour.json"), "validate"])
        .write_stdin(r#"[{"checkIn":"08:15","checkOut":"12:00","days":["monday"]}]"#)
        .assert()
        .code(1);
}

#[test]
fn remove_last_shift_depends_on_role() {
    shifts()
        .args(["remove", "--id", "abc", "--existing", &fixture("single.json")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("emptyResultRejected"));

    shifts()
        .args([
            "--role",
            "assistant",
            "remove",
            "--id",
            "abc",
            "--existing",
            &fixture("single.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\""));
}

#[test]
fn remove_unknown_id_is_no_change() {
    shifts()
        .args(["remove", "--id", "99", "--existing", &fixture("stored.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("noChanges"));
}

// ─────────────────────────────────────────────────────────────────────────────
// replace / conflicts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn replace_prints_delta() {
    let output = shifts()
        .args([
            "replace",
            "-i",
            &fixture("desired.json"),
            "--existing",
            &fixture("stored.json"),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["verdict"]["verdict"], "valid");
    assert_eq!(
        json["changes"]["toAdd"],
        serde_json::json!(["09:00|13:00|saturday"])
    );
    assert_eq!(json["changes"]["toRemove"][0]["id"], 2);
    assert_eq!(json["changes"]["unchanged"][0]["id"], 1);
}

#[test]
fn replace_with_empty_set_depends_on_role() {
    shifts()
        .args(["replace", "--existing", &fixture("stored.json")])
        .write_stdin("[]")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("emptyResultRejected"));

    let output = shifts()
        .args(["--role", "assistant", "replace", "--existing", &fixture("stored.json")])
        .write_stdin("[]")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["changes"]["toRemove"].as_array().unwrap().len(), 2);
}

#[test]
fn conflicts_lists_every_clash() {
    let input = r#"[
        {"checkIn":"10:00","checkOut":"14:00","days":["wednesday"]},
        {"checkIn":"14:00","checkOut":"18:00","days":["friday"]},
        {"checkIn":"07:00","checkOut":"09:00","days":["monday"]}
    ]"#;

    let output = shifts()
        .args(["conflicts", "--existing", &fixture("stored.json")])
        .write_stdin(input)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["overlap", "duplicate", "overlap"]);
}

// ─────────────────────────────────────────────────────────────────────────────
// equal
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn equal_ignores_order() {
    let output = shifts()
        .args(["equal", &fixture("stored.json"), &fixture("shuffled.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["equal"], true);
    assert_eq!(json["left"], json["right"]);
}

#[test]
fn equal_detects_difference() {
    shifts()
        .args(["equal", &fixture("stored.json"), &fixture("desired.json")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"equal\": false"));
}

// ─────────────────────────────────────────────────────────────────────────────
// book
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn book_inside_shift_without_bookings() {
    // 2026-03-16 is a Monday, covered by 08:00-12:00
    let output = shifts()
        .args([
            "book",
            "-i",
            &fixture("appointment.json"),
            "--existing",
            &fixture("stored.json"),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["verdict"], "bookable");
    assert_eq!(json["shift"]["checkIn"], "08:00");
}

#[test]
fn book_clash_and_reschedule() {
    let args = [
        "book".to_string(),
        "-i".to_string(),
        fixture("appointment.json"),
        "--existing".to_string(),
        fixture("stored.json"),
        "--bookings".to_string(),
        fixture("bookings.json"),
    ];

    shifts()
        .args(&args)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("clash"))
        .stdout(predicate::str::contains("b1"));

    shifts()
        .args(&args)
        .args(["--exclude", "b1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bookable"));
}

#[test]
fn book_outside_working_hours() {
    // Tuesday has no shift
    let input = r#"{"start":"2026-03-17T10:00:00","end":"2026-03-17T10:30:00"}"#;

    shifts()
        .args(["book", "--existing", &fixture("stored.json")])
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("outsideWorkingHours"));
}

#[test]
fn book_inverted_appointment_exits_2() {
    let input = r#"{"start":"2026-03-16T11:00:00","end":"2026-03-16T10:00:00"}"#;

    shifts()
        .args(["book", "--existing", &fixture("stored.json")])
        .write_stdin(input)
        .assert()
        .code(2);
}
