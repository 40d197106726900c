//! Nimbus host agent - downloads, installs and activates deployment bundles

use clap::Parser;

use nimbus_cli::cli::Cli;
use nimbus_cli::domain::error::UpdateError;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run() {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// Map a fatal error to the agent's own exit status.
///
/// A lifecycle script failure propagates the script's exit code so host
/// schedulers can tell "a hook refused the update" apart from agent faults;
/// everything else exits 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<UpdateError>())
        .map_or(1, |update_err| match update_err {
            UpdateError::Script { code, .. } if *code > 0 => *code,
            _ => 1,
        })
}
