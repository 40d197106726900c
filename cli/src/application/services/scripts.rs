//! Application service — lifecycle script orchestration.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ScriptRunner};
use crate::domain::error::UpdateError;
use crate::domain::script::{Phase, PhaseSet};

/// Run every script in `dir` whose phase is in `phases`, synchronously and
/// in lexical file-name order. A missing directory is a no-op, not an
/// error. The first non-zero exit aborts with [`UpdateError::Script`];
/// remaining scripts do not run.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed, a script cannot be
/// spawned, or a script exits non-zero.
pub fn run_phase_set(
    runner: &impl ScriptRunner,
    reporter: &impl ProgressReporter,
    dir: &Path,
    phases: PhaseSet,
) -> Result<()> {
    if !dir.exists() {
        reporter.step(&format!("no lifecycle scripts at {}", dir.display()));
        return Ok(());
    }

    for path in discover(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !phases.contains(Phase::of(&name)) {
            continue;
        }

        reporter.step(&format!("running {}", path.display()));
        let output = runner
            .run(&path)
            .with_context(|| format!("executing lifecycle script {}", path.display()))?;
        surface(&output);

        if !output.status.success() {
            return Err(UpdateError::Script {
                code: output.status.code().unwrap_or(1),
                path,
            }
            .into());
        }
    }
    Ok(())
}

/// Regular files directly inside `dir` (no recursion), sorted by file name
/// so same-phase ordering is deterministic across platforms.
fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut scripts: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing lifecycle scripts in {}", dir.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    scripts.sort();
    Ok(scripts)
}

/// Echo a script's captured output through the agent's own streams.
fn surface(output: &std::process::Output) {
    if !output.stdout.is_empty() {
        let _ = std::io::stdout().write_all(&output.stdout);
    }
    if !output.stderr.is_empty() {
        let _ = std::io::stderr().write_all(&output.stderr);
    }
}
