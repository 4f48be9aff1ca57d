//! Configuration error types

use thiserror::Error;

/// Errors raised while loading scroll options
///
/// The engine itself never fails; only reading configuration from text or
/// disk can.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read scroll options: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not valid TOML
    #[error("Invalid scroll options TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
