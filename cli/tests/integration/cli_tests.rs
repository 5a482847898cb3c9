//! Integration tests for the funnelwatch CLI skeleton
//!
//! These tests verify the CLI structure, argument parsing and the
//! offline commands.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn funnelwatch() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("funnelwatch"));
    cmd.env("NO_COLOR", "1")
        .env("FUNNELWATCH_CONFIG", "/nonexistent/funnelwatch/config.yaml")
        .env_remove("RUST_LOG");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_help_flag_shows_help() {
    funnelwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("mock"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    funnelwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("funnelwatch 0.1.0"));
}

#[test]
fn test_numeric_no_color_env_is_accepted() {
    for value in ["1", "0", "yes"] {
        funnelwatch()
            .env("NO_COLOR", value)
            .arg("probes")
            .assert()
            .success()
            .stdout(predicate::str::contains("GET /login"));
    }
}

// --- Argument validation ---

#[test]
fn test_unknown_flag_is_a_usage_error() {
    funnelwatch()
        .arg("--definitely-not-a-flag")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_zero_interval_is_rejected() {
    funnelwatch()
        .args(["--interval", "0", "--single"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--interval"));
}

#[test]
fn test_non_http_url_is_an_internal_error() {
    funnelwatch()
        .args(["--single", "ftp://localhost:3000"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid URL"));
}

// --- Offline commands ---

#[test]
fn test_probes_lists_default_table() {
    funnelwatch()
        .arg("probes")
        .assert()
        .success()
        .stdout(predicate::str::contains("GET /api/health"))
        .stdout(predicate::str::contains("POST /api/public/orders"))
        .stdout(predicate::str::contains("200|401"));
}

#[test]
fn test_probes_json_is_valid_array_of_ten() {
    let output = funnelwatch()
        .args(["probes", "--json"])
        .output()
        .expect("run funnelwatch");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is valid JSON");
    let probes = value.as_array().expect("JSON array");
    assert_eq!(probes.len(), 10);
    assert_eq!(probes[0]["method"], "GET");
    assert_eq!(probes[0]["path"], "/");
}

#[test]
fn test_invalid_config_exits_three() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "thresholds:\n  excellent: 150\n").expect("write config");
    funnelwatch()
        .args(["probes", "--config"])
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("excellent"));
}

#[test]
fn test_invalid_config_json_mode_prints_error_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "probe:\n  timeout_secs: 0\n").expect("write config");
    let output = funnelwatch()
        .args(["probes", "--json", "--config"])
        .arg(&path)
        .output()
        .expect("run funnelwatch");
    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "internal-error");
}

#[test]
fn test_launch_with_missing_binary_fails_to_start() {
    funnelwatch()
        .args([
            "launch",
            "--command",
            "definitely-not-a-real-binary-funnelwatch",
            "--startup-grace",
            "0",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to start"));
}
