//! Configuration error types

use thiserror::Error;

/// Errors loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors validating loaded configuration values.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("invalid database URL: must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("invalid server port: must be non-zero")]
    InvalidPort,

    #[error("invalid storage base URL: must start with http:// or https://")]
    InvalidStorageBaseUrl,

    #[error("invalid from email address")]
    InvalidFromEmail,
}
