//! File-backed manifest persistence.
//!
//! The manifest is the only durable state this agent owns: one absolute
//! path per line in a well-known cache file. Its existence is the signal
//! that a previous cycle installed something; its content is the removal
//! list for the next cycle.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ManifestStore;

/// Production [`ManifestStore`] writing to a cache file on the host.
pub struct FileManifestStore {
    path: PathBuf,
}

impl FileManifestStore {
    /// Store backed by the given cache file (configured path in
    /// production, a temp path in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ManifestStore for FileManifestStore {
    fn append(&self, paths: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening manifest {}", self.path.display()))?;
        for path in paths {
            writeln!(file, "{path}")
                .with_context(|| format!("writing manifest {}", self.path.display()))?;
        }
        Ok(())
    }

    fn read_and_clear(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading manifest {}", self.path.display()))?;
        // The file goes away before the caller acts on a single line: its
        // existence, not its content, means "cleanup pending".
        fs::remove_file(&self.path)
            .with_context(|| format!("removing manifest {}", self.path.display()))?;
        Ok(content
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
