//! Shared fixtures: a throwaway deploy host (root, scripts, manifest) plus
//! a local `file://` bundle mirror, and builders for real bundle bytes.

#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Everything one `nimbus update` run needs, isolated under a tempdir.
pub struct DeployFixture {
    pub dir: TempDir,
    pub config_path: PathBuf,
}

impl DeployFixture {
    pub fn new(bundle_types: &[&str]) -> Self {
        let dir = TempDir::new().expect("tempdir");
        for sub in ["store/bundles", "root", "init.d"] {
            std::fs::create_dir_all(dir.path().join(sub)).expect("mkdir");
        }

        let config_path = dir.path().join("agent.yaml");
        let config = format!(
            "\
environment: prod
version: \"42\"
bundle_types: [{types}]
store:
  endpoint: file://{store}
  bucket: bundles
paths:
  root: {root}
  manifest: {manifest}
  scripts_dir: {scripts}
retry:
  attempts: 1
  base_delay_ms: 0
",
            types = bundle_types.join(", "),
            store = dir.path().join("store").display(),
            root = dir.path().join("root").display(),
            manifest = dir.path().join("manifest").display(),
            scripts = dir.path().join("init.d").display(),
        );
        std::fs::write(&config_path, config).expect("write config");

        Self { dir, config_path }
    }

    /// Put an object into the mirror under the bucket.
    pub fn put_object(&self, key: &str, bytes: &[u8]) {
        let path = self.dir.path().join("store/bundles").join(key);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, bytes).expect("write object");
    }

    #[cfg(unix)]
    pub fn add_script(&self, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join("init.d").join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("root")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join("manifest")
    }

    /// Path the lifecycle scripts append their names to, so tests can
    /// assert execution order.
    pub fn script_log(&self) -> PathBuf {
        self.dir.path().join("script.log")
    }

    pub fn script_log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(self.script_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// A `nimbus update` invocation wired to this fixture's config.
    pub fn update_cmd(&self) -> Command {
        let mut cmd = nimbus();
        cmd.arg("update")
            .arg("--config")
            .arg(&self.config_path)
            .env("NIMBUS_TEST_LOG", self.script_log());
        cmd
    }
}

pub fn nimbus() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("nimbus"))
}

pub fn tar_gz_bundle(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *data)
            .expect("append tar entry");
    }
    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

pub fn zip_bundle(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
