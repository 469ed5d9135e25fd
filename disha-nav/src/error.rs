//! Error types for the navigation crate.

use thiserror::Error;

/// Errors raised while building flows or planners.
#[derive(Debug, Error)]
pub enum NavError {
    /// Invalid flow or planner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Malformed side-effect script.
    #[error("invalid script: {0}")]
    Script(String),

    /// Configuration file could not be parsed.
    #[error("configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// World-model construction error.
    #[error(transparent)]
    Map(#[from] smriti_map::MapError),
}

pub type Result<T> = std::result::Result<T, NavError>;
