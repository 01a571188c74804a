//! Application layer errors

use thiserror::Error;

/// Failures at the messaging-transport boundary. Logged and handled by the
/// router's fallback path; never shown to chat users.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Platform API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Router registration errors. These are startup bugs and are fatal.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Duplicate command token: /{0}")]
    DuplicateCommand(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
