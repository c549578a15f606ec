//! CLI Integration Tests
//!
//! Tests the `xlsform` binary directly using assert_cmd to exercise main.rs code paths.
//!
//! # Coverage Exclusion
//! These tests are skipped during coverage runs. Run without coverage for full testing.

#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn xlsform() -> Command {
    let mut cmd = Command::cargo_bin("xlsform").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("XLSFORM_LOG");
    cmd
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    xlsform()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsform"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    xlsform()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("xlsform"));
}

#[test]
fn test_export_help_describes_sheets() {
    xlsform()
        .args(["export", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings"))
        .stdout(predicate::str::contains("label::English (en)"));
}

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_validate_fixture() {
    xlsform()
        .args(["validate", "test-data/field_survey.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document is valid"));
}

#[test]
fn test_validate_missing_file_fails() {
    xlsform()
        .args(["validate", "test-data/nope.yaml"])
        .assert()
        .failure();
}

#[test]
fn test_validate_requires_file() {
    xlsform().arg("validate").assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT / IMPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_import_round_trip() {
    let dir = TempDir::new().unwrap();
    let xlsx = dir.path().join("field_survey.xlsx");
    let yaml = dir.path().join("field_survey.yaml");

    xlsform()
        .args(["export", "test-data/field_survey.yaml"])
        .arg(&xlsx)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export Complete"))
        .stdout(predicate::str::contains("Sheet:"))
        .stdout(predicate::str::contains("choices"));
    assert!(xlsx.exists());

    xlsform()
        .arg("import")
        .arg(&xlsx)
        .arg(&yaml)
        .assert()
        .success()
        .stdout(predicate::str::contains("Import Complete"));

    let content = std::fs::read_to_string(&yaml).unwrap();
    assert!(content.contains("formId: field_survey_v1"));
    assert!(content.contains("listName: regions"));

    xlsform().arg("validate").arg(&yaml).assert().success();
}

#[test]
fn test_export_refuses_broken_reference() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.yaml");
    let output = dir.path().join("broken.xlsx");
    std::fs::write(
        &input,
        "survey:\n  - type: select_one\n    name: pick\n    listName: nowhere\nsettings:\n  formTitle: B\n  formId: b\n",
    )
    .unwrap();

    xlsform()
        .arg("export")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stdout(predicate::str::contains("nowhere"));
    assert!(!output.exists());
}

#[test]
fn test_import_non_workbook_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("fake.xlsx");
    std::fs::write(&input, "plain text").unwrap();

    xlsform()
        .arg("import")
        .arg(&input)
        .arg(dir.path().join("out.yaml"))
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT / INIT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_inspect_lists_rows_and_ids() {
    xlsform()
        .args(["inspect", "test-data/field_survey.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("begin_group"))
        .stdout(predicate::str::contains("end_group"))
        .stdout(predicate::str::contains("q4"));
}

#[test]
fn test_init_creates_valid_document() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("starter.yaml");

    xlsform()
        .arg("init")
        .arg(&output)
        .args(["--form-id", "starter", "-l", "English (en)", "-l", "Spanish (es)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("starter"));

    xlsform().arg("validate").arg(&output).assert().success();

    xlsform()
        .arg("init")
        .arg(&output)
        .args(["--form-id", "again"])
        .assert()
        .failure();
}

#[test]
fn test_debug_logging_goes_to_stderr() {
    xlsform()
        .args(["--log-level", "debug", "inspect", "test-data/field_survey.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("flattened survey tree"));
}
