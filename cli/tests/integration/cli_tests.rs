//! Integration tests for the authflow CLI surface: help, version, flags.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn authflow() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("authflow"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    authflow()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Provision a deployment"));
}

#[test]
fn test_cli_help_lists_commands() {
    authflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    authflow()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("authflow"));
}

#[test]
fn test_version_command_shows_version() {
    authflow()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("authflow v0.1.0"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "true", "yes", "0", ""] {
        Command::new(assert_cmd::cargo::cargo_bin!("authflow"))
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("authflow v0.1.0"));
    }
}

#[test]
fn test_no_color_env_strips_ansi_codes() {
    authflow()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let out = authflow()
        .args(["version", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    assert_eq!(v["version"], "0.1.0");
}

#[test]
fn test_run_help_shows_options() {
    authflow()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--scenario"))
        .stdout(predicate::str::contains("--concurrent"))
        .stdout(predicate::str::contains("--stop-on-error"))
        .stdout(predicate::str::contains("--connect-timeout-ms"))
        .stdout(predicate::str::contains("AUTHFLOW_REFRESH_TOKEN"));
}

#[test]
fn test_run_rejects_unknown_scenario() {
    authflow()
        .args(["run", "--scenario", "staging"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_unknown_command_fails() {
    authflow().arg("deploy").assert().code(2);
}
