//! Configuration loading for the host agent.
//!
//! Resolution order: explicit `--config` flag, then the `NIMBUS_CONFIG`
//! environment variable, then the well-known host path. The file is
//! required — without a deploy target there is nothing to install.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::AgentConfig;

/// Well-known configuration path written by the provisioning layer.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nimbus/agent.yaml";

/// Resolve which configuration file to read.
#[must_use]
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(value) = std::env::var("NIMBUS_CONFIG") {
        return PathBuf::from(value);
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Load and parse the agent configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(explicit: Option<&Path>) -> Result<AgentConfig> {
    let path = config_path(explicit);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
