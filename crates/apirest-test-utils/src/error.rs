use apirest_config::ConfigError;
use thiserror::Error;

/// Error types for the test utilities
#[derive(Debug, Error)]
pub enum TestError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendered properties did not resolve
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Test setup failed
    #[error("Test setup failed: {0}")]
    TestSetupFailed(String),
}

pub type TestResult<T> = Result<T, TestError>;
