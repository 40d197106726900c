//! Pure domain types for the host agent.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.

pub mod config;
pub mod error;
pub mod script;

pub use config::AgentConfig;
pub use error::UpdateError;
pub use script::{Phase, PhaseSet};
