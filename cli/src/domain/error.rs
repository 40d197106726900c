//! Typed domain error enum for the update cycle.
//!
//! All fatal update-cycle failures flow through [`UpdateError`] so callers
//! (and tests) can match on the category; everything converts to
//! `anyhow::Error` via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure categories of one host-update cycle.
///
/// There is no variant for cleanup problems: a stale path that cannot be
/// removed is reported as a warning and never aborts the cycle.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// No artifact exists for the request in any supported encoding.
    #[error(
        "no bundle found for {environment}/{version}/{bundle_type} in any supported encoding (tar.bz2, tar.gz, zip)"
    )]
    BundleNotFound {
        environment: String,
        version: String,
        bundle_type: String,
    },

    /// Network or storage failure while probing or downloading an artifact.
    #[error("transfer failed for {key}: {reason}")]
    Transfer { key: String, reason: String },

    /// The downloaded artifact is corrupt, unreadable, or contains members
    /// that would escape the installation root.
    #[error("unusable bundle archive {key}: {reason}")]
    Archive { key: String, reason: String },

    /// A lifecycle script exited non-zero; the whole cycle aborts.
    #[error("lifecycle script {} exited with code {code}", .path.display())]
    Script { path: PathBuf, code: i32 },
}
