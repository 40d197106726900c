//! Agent configuration schema.
//!
//! The deploy target (environment, version, bundle types) and the object
//! store coordinates are resolved externally — typically written to
//! `/etc/nimbus/agent.yaml` by the provisioning layer — and consumed here
//! as plain data. Everything except the deploy target has defaults.

use std::path::PathBuf;
use std::time::Duration;

use nimbus_common::BundleRequest;
use serde::Deserialize;

/// Full agent configuration, deserialized from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Deploy environment name, e.g. `prod`.
    pub environment: String,
    /// Artifact version to install.
    pub version: String,
    /// Ordered list of bundle types to install each cycle.
    #[serde(default)]
    pub bundle_types: Vec<String>,
    /// Object store coordinates.
    pub store: StoreConfig,
    /// Host filesystem locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Bounded retry policy for store calls.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AgentConfig {
    /// The request triple for one configured bundle type.
    #[must_use]
    pub fn request_for(&self, bundle_type: &str) -> BundleRequest {
        BundleRequest {
            environment: self.environment.clone(),
            version: self.version.clone(),
            bundle_type: bundle_type.to_string(),
        }
    }
}

/// Where bundles live and how to reach them.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store endpoint: `https://` for an S3-compatible gateway, or
    /// `file://` for a local mirror.
    pub endpoint: String,
    /// Bucket (or mirror subdirectory) holding the bundles.
    pub bucket: String,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Per-request timeout. A stalled transfer fails the cycle instead of
    /// hanging the host update forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Host filesystem locations the agent touches.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Filesystem root bundles are extracted under.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Cache file listing every path the previous cycle installed.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Directory of lifecycle scripts.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            manifest: default_manifest(),
            scripts_dir: default_scripts_dir(),
        }
    }
}

/// Bounded exponential backoff for object store calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total tries per store call (1 = no retry).
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Delay before the first retry; doubles each subsequent retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    /// Delay before the first retry as a [`Duration`].
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("/var/lib/nimbus/manifest")
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("/etc/nimbus/init.d")
}

fn default_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}
