//! Error types for the world-model crate.

use thiserror::Error;

/// Errors raised while building or updating the world model.
#[derive(Debug, Error)]
pub enum MapError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
