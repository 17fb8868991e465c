//! Configuration error types

use std::path::PathBuf;

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building or loading a service configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but its value is unusable
    #[error("Invalid field value for {field}: {reason}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Credentials file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported file format
    #[error("Unsupported configuration file format. Use .toml, .yaml, .yml, or .json")]
    UnsupportedFormat,

    /// Configuration parsing error
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] config::ConfigError),
}
