use std::path::PathBuf;

use apirest_config::ConfigError;
use thiserror::Error;

/// Errors produced by the request executor, the response accessors and the
/// schema validator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Every attempt failed; carries the last attempt's failure
    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last_error: Box<ApiError>,
    },

    /// Transport failure during one attempt (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status treated as a failed attempt by the retry policy
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The request could not be built (bad URL, header, method)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be serialized; never retried
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The response body is not the JSON the caller asked for
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JMESPath expression failed to compile or evaluate
    #[error("JSON path '{path}' failed: {reason}")]
    JsonPath { path: String, reason: String },

    /// A response check (status, structure) did not hold
    #[error("Response check failed: {0}")]
    Assertion(String),

    /// Schema file does not exist
    #[error("Schema file not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    /// Schema file exists but is unreadable or not a valid JSON Schema
    #[error("Invalid schema {}: {reason}", .path.display())]
    InvalidSchema { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Whether the failure came from a single attempt and may succeed when
    /// the request is sent again. Requests reqwest refuses to build (for
    /// example an unsupported URL scheme) fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => !e.is_builder(),
            ApiError::UnexpectedStatus { .. } => true,
            _ => false,
        }
    }

    /// Attempt count when this is a [`ApiError::RetriesExhausted`]
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ApiError::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

/// Result alias used across the client crate
pub type ApiResult<T> = Result<T, ApiError>;
