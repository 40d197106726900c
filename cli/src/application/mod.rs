//! Application layer: port contracts and use-case services.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{ManifestStore, ObjectMeta, ObjectStore, ProgressReporter, ScriptRunner};
