//! Archive decoding — member enumeration and extraction for every
//! supported bundle encoding.
//!
//! The decoder is selected from the [`Encoding`] the locator matched,
//! never by sniffing file content. Member lists are normalized to
//! absolute `/`-prefixed paths because that is the form the manifest
//! records and the cleanup engine consumes.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};

use anyhow::{Context, Result, bail};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use nimbus_common::Encoding;

/// Enumerate the archive's member paths in stored order, normalized to
/// absolute form.
///
/// Enumeration happens before extraction so the caller can record the
/// removal list even when extraction later dies half-way.
///
/// # Errors
///
/// Returns an error if the archive cannot be decoded or any member would
/// escape the extraction root (`..` traversal).
pub fn list_members(path: &Path, encoding: Encoding) -> Result<Vec<String>> {
    let members = match encoding {
        Encoding::TarBz2 => tar_members(BzDecoder::new(open(path)?)),
        Encoding::TarGz => tar_members(GzDecoder::new(open(path)?)),
        Encoding::Zip => zip_members(open(path)?),
    }?;
    for member in &members {
        ensure_within_root(member)?;
    }
    Ok(members)
}

/// Extract every member under `root`, preserving relative paths and
/// member permissions.
///
/// # Errors
///
/// Returns an error if the archive cannot be decoded or a member cannot
/// be written.
pub fn extract(path: &Path, encoding: Encoding, root: &Path) -> Result<()> {
    match encoding {
        Encoding::TarBz2 => unpack_tar(BzDecoder::new(open(path)?), root),
        Encoding::TarGz => unpack_tar(GzDecoder::new(open(path)?), root),
        Encoding::Zip => {
            let mut archive = zip::ZipArchive::new(open(path)?).context("reading zip directory")?;
            archive
                .extract(root)
                .with_context(|| format!("extracting zip archive into {}", root.display()))
        }
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening downloaded bundle {}", path.display()))
}

fn tar_members(reader: impl Read) -> Result<Vec<String>> {
    let mut archive = tar::Archive::new(reader);
    let mut members = Vec::new();
    for entry in archive.entries().context("reading tar member list")? {
        let entry = entry.context("reading tar member header")?;
        let name = entry
            .path()
            .context("decoding tar member path")?
            .to_string_lossy()
            .into_owned();
        if name.is_empty() {
            continue;
        }
        members.push(normalize(&name));
    }
    Ok(members)
}

fn zip_members(file: File) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(file).context("reading zip directory")?;
    let mut members = Vec::new();
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .with_context(|| format!("reading zip member {index}"))?;
        let name = entry.name().to_string();
        if name.is_empty() {
            continue;
        }
        members.push(normalize(&name));
    }
    Ok(members)
}

fn unpack_tar(reader: impl Read, root: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive
        .unpack(root)
        .with_context(|| format!("extracting tar archive into {}", root.display()))
}

/// Manifest entries are always absolute, no matter how the archive stored
/// the member name.
fn normalize(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{name}")
    }
}

/// Bundles come from a trusted build pipeline, but a malformed member
/// name must still never write outside the installation root.
fn ensure_within_root(member: &str) -> Result<()> {
    let relative = member.trim_start_matches('/');
    for component in Path::new(relative).components() {
        match component {
            Component::ParentDir => {
                bail!("member {member} escapes the extraction root")
            }
            Component::Prefix(_) | Component::RootDir => {
                bail!("member {member} has an absolute component")
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(())
}
