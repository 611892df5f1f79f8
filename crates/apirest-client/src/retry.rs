//! Immediate-retry loop used by the executor.

use std::future::Future;

use apirest_config::Configuration;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// How many times a request is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, never below one
    pub max_attempts: u32,
    /// Count a non-2xx response as a failed attempt
    pub retry_on_error_status: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: apirest_config::configuration::DEFAULT_RETRY_COUNT,
            retry_on_error_status: false,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    pub fn from_configuration(config: &Configuration) -> Self {
        Self::new(config.retry_count())
    }

    pub fn with_retry_on_error_status(mut self, enabled: bool) -> Self {
        self.retry_on_error_status = enabled;
        self
    }

    /// Same policy with a different attempt count
    pub fn with_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Run `operation` until it succeeds or the attempts are used up.
    ///
    /// Attempts follow each other with no delay. The closure receives the
    /// 1-based attempt number. When every attempt fails the result is
    /// [`ApiError::RetriesExhausted`] wrapping the last failure. An error that
    /// is not [transient](ApiError::is_transient) is returned as is, without
    /// further attempts.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> ApiResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if !err.is_transient() => {
                    warn!(attempt, error = %err, "Request attempt failed permanently");
                    return Err(err);
                }
                Err(err) => {
                    warn!(attempt, max_attempts, error = %err, "Request attempt failed");
                    if attempt >= max_attempts {
                        return Err(ApiError::RetriesExhausted {
                            attempts: attempt,
                            last_error: Box::new(err),
                        });
                    }
                    attempt += 1;
                }
            }
        }
    }
}
