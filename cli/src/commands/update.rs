//! `nimbus update` — run one host-update cycle.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::application::services::update::run_cycle;
use crate::infra::config;
use crate::infra::manifest::FileManifestStore;
use crate::infra::scripts::ProcessScriptRunner;
use crate::infra::store;
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Path to the agent configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run `nimbus update`.
///
/// Loads the host configuration, wires the production adapters together,
/// and hands control to the update-cycle service. Fatal errors bubble up
/// to `main`, which maps them to the process exit status.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or any fatal step
/// of the cycle fails.
pub fn run(args: &UpdateArgs, ctx: &OutputContext) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    ctx.header(&format!(
        "Updating host to {}/{}",
        config.environment, config.version
    ));

    let store = store::open(&config.store, &config.retry)?;
    let manifest = FileManifestStore::with_path(config.paths.manifest.clone());
    let reporter = TerminalReporter::new(ctx);

    run_cycle(&store, &manifest, &ProcessScriptRunner, &reporter, &config)?;

    ctx.success("Done updating host");
    Ok(())
}
