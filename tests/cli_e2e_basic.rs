//! End-to-end tests for CLI argument handling and exit codes.
//!
//! These run the real binary but never reach an external tool: they cover
//! clap usage errors, help output, and the project-resolution failure path.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("modlink");

    cmd.arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("enable"))
        .stdout(predicate::str::contains("commit-queue"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("modlink");

    cmd.arg("--version").assert().code(0);
}

/// Exit code 2 is returned for unknown command-line flags (handled by clap).
#[test]
fn test_exit_code_usage_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("modlink");

    cmd.arg("list").arg("--definitely-not-a-flag").assert().code(2);
}

/// Exit code 2 is returned when a required argument is missing.
#[test]
fn test_enable_requires_module() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("modlink");

    cmd.env("HOME", temp.path())
        .env_remove("MODLINK_PROJECT")
        .arg("--project")
        .arg("my-project")
        .arg("enable")
        .assert()
        .code(2);
}

/// Without --project, MODLINK_PROJECT, or a saved default, commands fail
/// with an actionable message.
#[test]
fn test_missing_project_is_an_error() {
    // Point HOME at an empty directory so no ~/.modlink.yml is picked up.
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("modlink");

    cmd.env("HOME", temp.path())
        .env_remove("MODLINK_PROJECT")
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No project specified"))
        .stderr(predicate::str::contains("--project"));
}

/// The project can come from the environment instead of the flag.
#[test]
fn test_project_from_environment() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("modlink");

    // The project resolves, so the failure (if any) is no longer about a
    // missing project.
    cmd.env("HOME", temp.path())
        .env("MODLINK_PROJECT", "my-project")
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .stderr(predicate::str::contains("No project specified").not());
}
