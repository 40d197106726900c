//! End-to-end tests for `nimbus update` against a local bundle mirror.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::helpers::{DeployFixture, tar_gz_bundle, zip_bundle};

#[cfg(unix)]
#[test]
fn test_update_installs_bundle_and_sequences_lifecycle_scripts() {
    let fx = DeployFixture::new(&["app"]);
    fx.put_object(
        "prod/42/bundle-prod-42-app.tar.gz",
        &tar_gz_bundle(&[
            ("opt/app/bin", b"#!/bin/sh\n"),
            ("opt/app/conf.yml", b"a: 1\n"),
        ]),
    );
    // The stop hook sees the host before extraction; fail loudly if the
    // new payload is already there.
    fx.add_script(
        "K10stop",
        &format!(
            "test ! -e {} || exit 9\necho K10stop >> \"$NIMBUS_TEST_LOG\"",
            fx.root().join("opt/app/conf.yml").display()
        ),
    );
    fx.add_script(
        "S50start",
        &format!(
            "test -e {} || exit 9\necho S50start >> \"$NIMBUS_TEST_LOG\"",
            fx.root().join("opt/app/conf.yml").display()
        ),
    );
    fx.add_script("99-migrate", "echo 99-migrate >> \"$NIMBUS_TEST_LOG\"");

    fx.update_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Done updating host"));

    assert_eq!(
        std::fs::read(fx.root().join("opt/app/conf.yml")).expect("read"),
        b"a: 1\n"
    );
    assert_eq!(
        std::fs::read_to_string(fx.manifest_path()).expect("manifest"),
        "/opt/app/bin\n/opt/app/conf.yml\n"
    );
    assert_eq!(
        fx.script_log_lines(),
        vec!["99-migrate", "K10stop", "99-migrate", "S50start"],
        "other scripts run in both halves, sorted within each"
    );
}

#[cfg(unix)]
#[test]
fn test_second_cycle_removes_previous_bundle_files() {
    let fx = DeployFixture::new(&["app"]);
    fx.put_object(
        "prod/42/bundle-prod-42-app.tar.gz",
        &tar_gz_bundle(&[("opt/app/old.conf", b"old\n")]),
    );
    fx.update_cmd().assert().success();
    assert!(fx.root().join("opt/app/old.conf").exists());

    // The control plane republishes version 42 with a different layout;
    // delete one path by hand to exercise the silent-skip branch too.
    fx.put_object(
        "prod/42/bundle-prod-42-app.tar.gz",
        &tar_gz_bundle(&[("opt/app/new.conf", b"new\n")]),
    );
    std::fs::write(fx.manifest_path(), "/opt/app/old.conf\n/opt/app/gone.conf\n")
        .expect("seed manifest");

    fx.update_cmd().assert().success();

    assert!(!fx.root().join("opt/app/old.conf").exists());
    assert!(fx.root().join("opt/app/new.conf").exists());
    assert_eq!(
        std::fs::read_to_string(fx.manifest_path()).expect("manifest"),
        "/opt/app/new.conf\n",
        "the manifest now describes only the latest cycle"
    );
}

#[test]
fn test_update_installs_zip_bundles() {
    let fx = DeployFixture::new(&["app"]);
    fx.put_object(
        "prod/42/bundle-prod-42-app.zip",
        &zip_bundle(&[("opt/app/conf.yml", b"a: 1\n")]),
    );

    fx.update_cmd().assert().success();

    assert_eq!(
        std::fs::read(fx.root().join("opt/app/conf.yml")).expect("read"),
        b"a: 1\n"
    );
}

#[test]
fn test_update_prefers_tar_gz_over_zip() {
    let fx = DeployFixture::new(&["app"]);
    fx.put_object(
        "prod/42/bundle-prod-42-app.tar.gz",
        &tar_gz_bundle(&[("opt/app/from-tar", b"tar\n")]),
    );
    fx.put_object(
        "prod/42/bundle-prod-42-app.zip",
        &zip_bundle(&[("opt/app/from-zip", b"zip\n")]),
    );

    fx.update_cmd().assert().success();

    assert!(fx.root().join("opt/app/from-tar").exists());
    assert!(
        !fx.root().join("opt/app/from-zip").exists(),
        "lower-priority encodings are never fetched once a match exists"
    );
}

#[cfg(unix)]
#[test]
fn test_missing_bundle_aborts_before_post_start_scripts() {
    let fx = DeployFixture::new(&["app"]);
    fx.add_script("S50start", "echo S50start >> \"$NIMBUS_TEST_LOG\"");

    fx.update_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no bundle found"));

    assert!(
        fx.script_log_lines().is_empty(),
        "start hooks must not fire for a missing bundle"
    );
}

#[cfg(unix)]
#[test]
fn test_failing_stop_script_propagates_its_exit_code() {
    let fx = DeployFixture::new(&["app"]);
    fx.put_object(
        "prod/42/bundle-prod-42-app.tar.gz",
        &tar_gz_bundle(&[("opt/app/conf.yml", b"a: 1\n")]),
    );
    fx.add_script("K10stop", "exit 7");

    fx.update_cmd()
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("K10stop"));

    assert!(
        !fx.manifest_path().exists(),
        "an aborted cycle must not create a manifest"
    );
    assert!(
        !fx.root().join("opt/app/conf.yml").exists(),
        "an aborted cycle must not extract anything"
    );
}

#[test]
fn test_no_bundle_types_configured_is_fatal() {
    let fx = DeployFixture::new(&[]);

    fx.update_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no bundle types"));
}

#[test]
fn test_corrupt_bundle_fails_with_the_artifact_key() {
    let fx = DeployFixture::new(&["app"]);
    fx.put_object("prod/42/bundle-prod-42-app.tar.gz", b"not a gzip stream");

    fx.update_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundle-prod-42-app.tar.gz"));

    assert!(
        !fx.manifest_path().exists(),
        "an unreadable archive must record nothing"
    );
}

#[test]
fn test_multiple_bundle_types_install_in_configured_order() {
    let fx = DeployFixture::new(&["app", "conf"]);
    fx.put_object(
        "prod/42/bundle-prod-42-app.tar.gz",
        &tar_gz_bundle(&[("opt/app/bin", b"bin\n")]),
    );
    fx.put_object(
        "prod/42/bundle-prod-42-conf.tar.gz",
        &tar_gz_bundle(&[("etc/app/app.conf", b"k=v\n")]),
    );

    fx.update_cmd().assert().success();

    assert_eq!(
        std::fs::read_to_string(fx.manifest_path()).expect("manifest"),
        "/opt/app/bin\n/etc/app/app.conf\n",
        "manifest accumulates bundle types in configured order"
    );
}
