//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// Nimbus host agent - downloads, installs and activates deployment bundles
#[derive(Parser)]
#[command(
    name = "nimbus",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one host-update cycle: lifecycle hooks, cleanup, bundle install
    Update(commands::update::UpdateArgs),

    /// Show version
    Version {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            command,
        } = self;
        match command {
            Command::Version { json } => {
                commands::version::run(json);
                Ok(())
            }
            Command::Update(args) => {
                let ctx = OutputContext::new(no_color, quiet);
                commands::update::run(&args, &ctx)
            }
        }
    }
}
