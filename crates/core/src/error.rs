//! Core error types

use thiserror::Error;

/// Core error type for Skydrop
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Result alias using [`CoreError`]
pub type Result<T> = std::result::Result<T, CoreError>;
