//! Configuration error types.

use thiserror::Error;

/// Errors that occur while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors that occur during semantic validation of loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required configuration value: {0}")]
    MissingRequired(&'static str),

    #[error("Database URL must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("Redis URL must start with redis:// or rediss://")]
    InvalidRedisUrl,

    #[error("Broker URL must start with nats://")]
    InvalidBrokerUrl,

    #[error("Configuration value out of range: {0}")]
    OutOfRange(&'static str),
}
