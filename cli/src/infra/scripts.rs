//! Process-spawning implementation of the `ScriptRunner` port.

use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Context, Result};

use crate::application::ports::ScriptRunner;

/// Runs lifecycle scripts as child processes, blocking until each exits
/// and capturing both output streams for the orchestrator to surface.
pub struct ProcessScriptRunner;

impl ScriptRunner for ProcessScriptRunner {
    fn run(&self, path: &Path) -> Result<Output> {
        Command::new(path)
            .output()
            .with_context(|| format!("spawning {}", path.display()))
    }
}
