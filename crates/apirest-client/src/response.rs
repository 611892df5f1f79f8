//! Accessors over a completed HTTP exchange.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Status, headers and body of one response.
///
/// Returned by value from every executor call. The body is read eagerly so
/// the handle can be inspected any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body: String,
    elapsed: Duration,
}

impl ApiResponse {
    pub fn new(
        status: u16,
        headers: BTreeMap<String, String>,
        body: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        // Header names are case-insensitive; store them lower-cased
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body: body.into(),
            elapsed,
        }
    }

    /// Read a reqwest response into an owned handle
    pub(crate) async fn read(response: reqwest::Response, elapsed: Duration) -> ApiResult<Self> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;
        Ok(Self::new(status, headers, body, elapsed))
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Time from sending the request to receiving the full body
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn body_contains(&self, text: &str) -> bool {
        self.body.contains(text)
    }

    /// Body with line breaks removed, for single-line log output
    pub fn body_one_line(&self) -> String {
        self.body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Body parsed as JSON
    pub fn json(&self) -> ApiResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Body deserialized into a model
    pub fn deserialize<T: DeserializeOwned>(&self) -> ApiResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Evaluate a JMESPath expression against the body.
    ///
    /// A leading `$.` is accepted and dropped, so `$.books[*].isbn` and
    /// `books[*].isbn` are equivalent. `$` alone selects the whole document.
    pub fn value_at(&self, path: &str) -> ApiResult<Value> {
        let document = self.json()?;
        let expression = normalize_path(path);

        let compiled = jmespath::compile(expression).map_err(|e| ApiError::JsonPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let result = compiled.search(&document).map_err(|e| ApiError::JsonPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::to_value(&*result).map_err(|e| ApiError::JsonPath {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Values selected by a path as a list: arrays are flattened into the
    /// list, `null` gives an empty list and any other value one element.
    pub fn list_for_path(&self, path: &str) -> ApiResult<Vec<Value>> {
        Ok(match self.value_at(path)? {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => vec![other],
        })
    }

    /// Fail unless the status code equals `expected`
    pub fn validate_status(&self, expected: u16) -> ApiResult<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(ApiError::Assertion(format!(
                "expected status {expected}, got {}: {}",
                self.status,
                self.body_one_line()
            )))
        }
    }

    /// Fail unless the body is a JSON object or array
    pub fn validate_json_structure(&self) -> ApiResult<()> {
        match self.json() {
            Ok(Value::Object(_)) | Ok(Value::Array(_)) => Ok(()),
            Ok(other) => Err(ApiError::Assertion(format!(
                "expected a JSON object or array, got {other}"
            ))),
            Err(e) => Err(ApiError::Assertion(format!("body is not JSON: {e}"))),
        }
    }

    /// Whether the response arrived within `max`
    pub fn within_response_time(&self, max: Duration) -> bool {
        if self.elapsed <= max {
            debug!(elapsed_ms = self.elapsed.as_millis() as u64, "Response time within limit");
            true
        } else {
            warn!(
                elapsed_ms = self.elapsed.as_millis() as u64,
                max_ms = max.as_millis() as u64,
                "Response time exceeded limit"
            );
            false
        }
    }
}

fn normalize_path(path: &str) -> &str {
    let path = path.trim();
    if path == "$" {
        "@"
    } else {
        path.strip_prefix("$.").unwrap_or(path)
    }
}
