//! CLI surface tests: help text, version output, argument validation.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::helpers::nimbus;

#[test]
fn test_no_args_shows_help_and_fails() {
    nimbus()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_lists_update_and_version() {
    nimbus()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update").and(predicate::str::contains("version")));
}

#[test]
fn test_update_help_shows_description() {
    nimbus()
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("host-update cycle"));
}

#[test]
fn test_version_prints_package_version() {
    nimbus()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_json_is_machine_readable() {
    nimbus()
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            r#"{{"version":"{}"}}"#,
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_update_without_config_fails_with_the_path() {
    nimbus()
        .args(["update", "--config", "/nonexistent/agent.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/agent.yaml"));
}

#[test]
fn test_update_honors_nimbus_config_env() {
    nimbus()
        .arg("update")
        .env("NIMBUS_CONFIG", "/nonexistent/from-env.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/from-env.yaml"));
}
