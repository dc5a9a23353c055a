//! Integration tests for the `blochd` binary entry point.
//!
//! Verifies the argument surface and the startup failure path; nothing here
//! needs the scheduler module or privileged access.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn version_probe_succeeds() {
    let mut command = cargo_bin_cmd!("blochd");
    command.arg("--version");
    command.assert().success();
}

#[test]
fn missing_device_exits_with_failure() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let device = dir.path().join("absent");
    let mut command = cargo_bin_cmd!("blochd");
    command.arg("--device");
    command.arg(&device);
    command.assert().failure().stderr(contains("not found"));
}

#[test]
fn unknown_flags_exit_with_failure() {
    let mut command = cargo_bin_cmd!("blochd");
    command.arg("--frequency");
    command.assert().failure();
}
