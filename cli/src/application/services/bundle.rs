//! Application service — fetch one located bundle and extract it on the host.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{ManifestStore, ObjectStore, ProgressReporter};
use crate::application::services::locator::BundleLocation;
use crate::domain::error::UpdateError;
use crate::infra::archive;

/// Download `location` to a scratch file, record its member list in the
/// manifest, then extract everything under `root`. Returns the recorded
/// member paths (always absolute, `/`-prefixed).
///
/// The member list is written to the manifest *before* extraction so that
/// a cycle that dies mid-extraction still leaves a complete removal list
/// for the next cycle to clean up. The scratch file is removed on every
/// exit path, including failures.
///
/// # Errors
///
/// Returns [`UpdateError::Transfer`] if the download fails and
/// [`UpdateError::Archive`] if the archive cannot be decoded or contains
/// members that would escape `root`.
pub fn install(
    store: &impl ObjectStore,
    manifest: &impl ManifestStore,
    reporter: &impl ProgressReporter,
    location: &BundleLocation,
    root: &Path,
) -> Result<Vec<String>> {
    // Scratch suffix must match the encoding: the decoder is chosen
    // structurally, never by sniffing content.
    let scratch = tempfile::Builder::new()
        .prefix("nimbus-bundle-")
        .suffix(&format!(".{}", location.encoding.extension()))
        .tempfile()
        .context("creating scratch file for bundle download")?;

    let bytes = store
        .fetch(&location.key, scratch.path())
        .map_err(|err| UpdateError::Transfer {
            key: location.key.clone(),
            reason: format!("{err:#}"),
        })?;
    reporter.step(&format!("downloaded {} ({bytes} bytes)", location.key));

    let members =
        archive::list_members(scratch.path(), location.encoding).map_err(|err| {
            UpdateError::Archive {
                key: location.key.clone(),
                reason: format!("{err:#}"),
            }
        })?;

    manifest
        .append(&members)
        .context("recording installed paths in the manifest")?;

    archive::extract(scratch.path(), location.encoding, root).map_err(|err| {
        UpdateError::Archive {
            key: location.key.clone(),
            reason: format!("{err:#}"),
        }
    })?;

    Ok(members)
}
