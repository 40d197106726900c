//! Application service — locate a bundle artifact in the object store.

use anyhow::Result;
use nimbus_common::{BundleRequest, Encoding, bundle_key};

use crate::application::ports::ObjectStore;
use crate::domain::error::UpdateError;

/// A located artifact: which key to fetch and how to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLocation {
    /// Remote object key.
    pub key: String,
    /// Archive encoding, chosen structurally from the key that matched.
    pub encoding: Encoding,
    /// Size reported by the store's metadata probe, when available.
    pub size_hint: Option<u64>,
}

/// Probe the store for `request` across the fixed encoding priority order
/// and return the first match.
///
/// Encodings are mutually exclusive representations of the same logical
/// artifact, so probing stops at the first hit.
///
/// # Errors
///
/// Returns [`UpdateError::BundleNotFound`] when no encoding matches — fatal
/// for the whole cycle, not skippable per bundle type — and
/// [`UpdateError::Transfer`] when the store cannot be asked.
pub fn locate(store: &impl ObjectStore, request: &BundleRequest) -> Result<BundleLocation> {
    for encoding in Encoding::PRIORITY {
        let key = bundle_key(request, encoding);
        let probed = store.probe(&key).map_err(|err| UpdateError::Transfer {
            key: key.clone(),
            reason: format!("{err:#}"),
        })?;
        if let Some(meta) = probed {
            return Ok(BundleLocation {
                key,
                encoding,
                size_hint: meta.size,
            });
        }
    }
    Err(UpdateError::BundleNotFound {
        environment: request.environment.clone(),
        version: request.version.clone(),
        bundle_type: request.bundle_type.clone(),
    }
    .into())
}
