//! Bundle identity: the deploy target triple, supported archive encodings,
//! and the remote key template shared with the control-plane packager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Compression/container format of a bundle artifact.
///
/// A logical bundle is uploaded in exactly one of these encodings; the
/// agent probes them in [`Encoding::PRIORITY`] order and uses the first
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// tar archive compressed with bzip2 (`.tar.bz2`)
    #[serde(rename = "tar.bz2")]
    TarBz2,
    /// tar archive compressed with gzip (`.tar.gz`)
    #[serde(rename = "tar.gz")]
    TarGz,
    /// zip archive (`.zip`)
    #[serde(rename = "zip")]
    Zip,
}

impl Encoding {
    /// Fixed probe order. This is policy, not preference: once an artifact
    /// is found in one encoding, lower-priority encodings are never tried.
    pub const PRIORITY: [Encoding; 3] = [Encoding::TarBz2, Encoding::TarGz, Encoding::Zip];

    /// File extension used in remote keys and scratch file names.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::TarBz2 => "tar.bz2",
            Encoding::TarGz => "tar.gz",
            Encoding::Zip => "zip",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// The environment/version/bundle-type triple identifying one bundle to
/// deploy. Immutable; constructed once per bundle type per update cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequest {
    /// Deploy environment, e.g. `prod`.
    pub environment: String,
    /// Artifact version string, e.g. `42` or `1.4.0-rc2`.
    pub version: String,
    /// Named bundle category, e.g. `app` or `conf`.
    pub bundle_type: String,
}

/// Remote object key for a bundle in a given encoding.
///
/// The template is shared verbatim with the packager:
/// `{env}/{version}/bundle-{env}-{version}-{type}.{ext}`.
#[must_use]
pub fn bundle_key(request: &BundleRequest, encoding: Encoding) -> String {
    format!(
        "{env}/{version}/bundle-{env}-{version}-{bundle}.{ext}",
        env = request.environment,
        version = request.version,
        bundle = request.bundle_type,
        ext = encoding.extension(),
    )
}
