//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

// ── Object Store Port ─────────────────────────────────────────────────────────

/// Metadata returned by an existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Object size in bytes, when the store reports one.
    pub size: Option<u64>,
}

/// Read-only access to the bundle store.
///
/// `Ok(None)` from [`probe`](ObjectStore::probe) means "the object does not
/// exist" and is a normal answer; `Err` means the store could not be asked
/// at all (a transfer failure).
pub trait ObjectStore {
    /// Check whether `key` exists, returning its metadata if so.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn probe(&self, key: &str) -> Result<Option<ObjectMeta>>;

    /// Download `key` into the local file at `dest`, returning the number
    /// of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error on any network, storage, or local I/O failure.
    fn fetch(&self, key: &str, dest: &Path) -> Result<u64>;
}

// ── Manifest Store Port ───────────────────────────────────────────────────────

/// Persistence for "what the last cycle installed".
///
/// The manifest accumulates across all bundle types of one cycle and is
/// consumed whole at the start of the next.
pub trait ManifestStore {
    /// Record installed paths, preserving order, additive across calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    fn append(&self, paths: &[String]) -> Result<()>;

    /// Return everything recorded by the previous cycle and clear the
    /// store. A store with no prior cycle returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if existing manifest data cannot be read or cleared.
    fn read_and_clear(&self) -> Result<Vec<String>>;
}

// ── Script Runner Port ────────────────────────────────────────────────────────

/// Executes one lifecycle script and captures its output.
pub trait ScriptRunner {
    /// Run the script at `path` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    /// A non-zero exit is NOT an error here — the orchestrator inspects
    /// the returned status.
    fn run(&self, path: &Path) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
