//! Integration tests for the wac CLI
//!
//! These tests run the actual CLI binary against a temporary workflows
//! directory and verify exit status and output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test, isolated from the caller's environment
fn wac_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wac").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("WAC_WORKFLOWS_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn workflows_dir(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join(".github").join("workflows")
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    wac_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let dir = TempDir::new().unwrap();
    wac_cmd(&dir)
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deploy"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_command_is_usage_error() {
    let dir = TempDir::new().unwrap();
    wac_cmd(&dir).assert().failure();
}

// ============================================================================
// generate / check round trip
// ============================================================================

#[test]
fn test_generate_writes_every_workflow() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflow generated at"))
        .stdout(predicate::str::contains("ci.yml"))
        .stdout(predicate::str::contains("rust-lint.yml"))
        .stdout(predicate::str::contains("rust-test.yml"));

    let ci = fs::read_to_string(workflows_dir(&dir).join("ci.yml")).unwrap();
    assert!(ci.contains("name: CI"));
    assert!(ci.contains("actions/checkout@v4"));
}

#[test]
fn test_generate_then_check_succeeds() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir).arg("generate").assert().success();
    wac_cmd(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflows are ok!"));
}

#[test]
fn test_check_without_files_fails() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("WAC-010"))
        .stderr(predicate::str::contains("ci"))
        .stderr(predicate::str::contains("wac generate"));
}

#[test]
fn test_check_reports_every_out_of_sync_workflow() {
    let dir = TempDir::new().unwrap();
    wac_cmd(&dir).arg("generate").assert().success();

    let lint = workflows_dir(&dir).join("rust-lint.yml");
    let edited = fs::read_to_string(&lint)
        .unwrap()
        .replace("cargo fmt", "cargo  fmt");
    fs::write(&lint, edited).unwrap();
    fs::remove_file(workflows_dir(&dir).join("rust-test.yml")).unwrap();

    wac_cmd(&dir)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ci"))
        .stderr(predicate::str::contains("rust-lint"))
        .stderr(predicate::str::contains("WAC-011"))
        .stderr(predicate::str::contains("rust-test"))
        .stderr(predicate::str::contains("WAC-010"))
        .stderr(predicate::str::contains("2 of 3 workflows failed to check"))
        .stderr(predicate::str::contains("Please regenerate them"));
}

#[test]
fn test_check_never_writes() {
    let dir = TempDir::new().unwrap();
    wac_cmd(&dir).arg("check").assert().failure();
    assert!(!workflows_dir(&dir).join("ci.yml").exists());
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_dir_flag_and_env() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir)
        .args(["generate", "--dir", "out"])
        .assert()
        .success();
    assert!(dir.path().join("out").join("ci.yml").exists());

    wac_cmd(&dir)
        .arg("check")
        .env("WAC_WORKFLOWS_DIR", "out")
        .assert()
        .success();
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("wac.toml"),
        "workflows_dir = \"ci\"\nextension = \"yaml\"\n",
    )
    .unwrap();

    wac_cmd(&dir).arg("generate").assert().success();
    assert!(dir.path().join("ci").join("rust-test.yaml").exists());
    wac_cmd(&dir).arg("check").assert().success();
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir)
        .args(["check", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WAC-031"));
}

#[test]
fn test_workflow_filter() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir)
        .args(["generate", "--workflow", "rust-lint"])
        .assert()
        .success();
    assert!(workflows_dir(&dir).join("rust-lint.yml").exists());
    assert!(!workflows_dir(&dir).join("ci.yml").exists());

    wac_cmd(&dir)
        .args(["check", "-w", "rust-lint"])
        .assert()
        .success();
}

#[test]
fn test_unknown_workflow_filter_fails() {
    let dir = TempDir::new().unwrap();

    wac_cmd(&dir)
        .args(["check", "--workflow", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown workflow 'deploy'"));
}

#[test]
fn test_json_format() {
    let dir = TempDir::new().unwrap();
    wac_cmd(&dir)
        .args(["generate", "-w", "ci"])
        .assert()
        .success();

    let output = wac_cmd(&dir)
        .args(["check", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["command"], "check");
    assert_eq!(json["success"], false);
    assert_eq!(json["workflows"][0]["workflow"], "ci");
    assert_eq!(json["workflows"][0]["status"], "ok");
    assert_eq!(json["workflows"][1]["status"], "out_of_sync");
}
