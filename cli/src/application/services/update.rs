//! Application service — the host-update cycle.
//!
//! This is the only service a command handler invokes directly; it fixes
//! the order of every other service. The sequence is not reorderable:
//! stop hooks must run before old files disappear, and start hooks must
//! not run until every configured bundle type is installed.

use anyhow::Result;

use crate::application::ports::{ManifestStore, ObjectStore, ProgressReporter, ScriptRunner};
use crate::application::services::{bundle, cleanup, locator, scripts};
use crate::domain::config::AgentConfig;
use crate::domain::script::PhaseSet;

/// Run one complete host-update cycle:
///
/// 1. lifecycle scripts, pre-stop half
/// 2. cleanup of everything the previous cycle installed
/// 3. locate + fetch + extract each configured bundle type, recording
///    installed paths in the manifest as it goes
/// 4. lifecycle scripts, post-start half
///
/// Any fatal step aborts the remaining sequence immediately; there is no
/// partial continuation across bundle types and no automatic retry beyond
/// the store's own bounded-backoff policy.
///
/// # Errors
///
/// Returns an error on the first fatal step; see
/// [`UpdateError`](crate::domain::error::UpdateError) for the categories.
pub fn run_cycle(
    store: &impl ObjectStore,
    manifest: &impl ManifestStore,
    runner: &impl ScriptRunner,
    reporter: &impl ProgressReporter,
    config: &AgentConfig,
) -> Result<()> {
    scripts::run_phase_set(runner, reporter, &config.paths.scripts_dir, PhaseSet::PRE_UPDATE)?;

    if config.bundle_types.is_empty() {
        anyhow::bail!(
            "no bundle types configured for {}/{} — nothing to deploy",
            config.environment,
            config.version
        );
    }

    let previous = manifest.read_and_clear()?;
    if previous.is_empty() {
        reporter.step("no previous bundle files to clean up");
    } else {
        cleanup::clean_previous(&config.paths.root, &previous, reporter);
    }

    for bundle_type in &config.bundle_types {
        let request = config.request_for(bundle_type);
        let location = locator::locate(store, &request)?;
        match location.size_hint {
            Some(size) => reporter.step(&format!("found {} ({size} bytes)", location.key)),
            None => reporter.step(&format!("found {}", location.key)),
        }

        let members = bundle::install(store, manifest, reporter, &location, &config.paths.root)?;
        reporter.success(&format!("installed {bundle_type} ({} paths)", members.len()));
    }

    scripts::run_phase_set(runner, reporter, &config.paths.scripts_dir, PhaseSet::POST_UPDATE)?;
    Ok(())
}
