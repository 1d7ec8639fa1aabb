//! Integration tests for the seport CLI.
//!
//! These tests verify that the CLI binary behaves correctly, including
//! argument parsing, help text, and version output. They stop at the
//! argument layer so they run on hosts without SELinux or semanage.

use assert_cmd::Command;
use predicates::prelude::*;

fn seport() -> Command {
    Command::cargo_bin("seport").expect("Failed to find seport binary")
}

/// Test that the binary runs without arguments and displays help/error.
#[test]
fn test_cli_no_arguments() {
    // With clap subcommands required, no arguments should fail and show usage
    seport()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

/// Test that the --version flag displays version information.
#[test]
fn test_cli_version_flag() {
    seport()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("seport"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that the --help flag lists the available commands.
#[test]
fn test_cli_help_lists_commands() {
    seport()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("list"));
}

/// Test that apply --help documents the binding arguments.
#[test]
fn test_apply_help() {
    seport()
        .args(["apply", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--proto"))
        .stdout(predicate::str::contains("--setype"))
        .stdout(predicate::str::contains("--dry-run"));
}

/// Test that apply rejects an unknown protocol at the argument layer.
#[test]
fn test_apply_rejects_unknown_protocol() {
    seport()
        .args([
            "apply",
            "--port",
            "8888",
            "--proto",
            "icmp",
            "--setype",
            "http_port_t",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("icmp"));
}

/// Test that apply requires the binding arguments.
#[test]
fn test_apply_requires_arguments() {
    seport()
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

/// Test that apply rejects an unknown state value.
#[test]
fn test_apply_rejects_unknown_state() {
    seport()
        .args([
            "apply",
            "--port",
            "8888",
            "--proto",
            "tcp",
            "--setype",
            "http_port_t",
            "--state",
            "ensure",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

/// Test that list rejects an unknown output format.
#[test]
fn test_list_rejects_unknown_format() {
    seport()
        .args(["list", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
