use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The properties file could not be read
    #[error("Failed to read properties file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A numeric key holds something that is not an integer
    #[error("Invalid number for '{key}': '{value}'")]
    InvalidNumber { key: String, value: String },

    /// A key holds a value outside its allowed range
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// `runner.execution.test` names a runner this harness does not provide
    #[error("Runner not configured or not supported: {0}")]
    UnsupportedRunner(String),
}

/// Result alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
