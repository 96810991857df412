//! Configuration error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Unknown environment: {value}")]
    UnknownEnvironment { value: String },

    #[error("Invalid configuration for {key}: {reason}")]
    Invalid { key: String, reason: String },
}
