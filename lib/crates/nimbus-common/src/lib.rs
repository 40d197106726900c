//! Shared types for the Nimbus deploy pipeline.
//!
//! Both halves of the pipeline depend on this crate: the control-plane
//! packager that uploads bundles, and the host agent (`nimbus-cli`) that
//! downloads and installs them. Keeping the artifact naming scheme in one
//! place is what guarantees the two sides agree on where a bundle lives.

pub mod bundle;

pub use bundle::{BundleRequest, Encoding, bundle_key};
