//! The single entry point for sending requests.

use std::time::{Duration, Instant};

use apirest_config::Configuration;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::{debug, info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::request::RequestSpec;
use crate::response::ApiResponse;
use crate::retry::RetryPolicy;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Settings applied when a [`RequestSpec`] leaves them unset
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorDefaults {
    pub base_url: String,
    pub connection_timeout: Duration,
    pub read_timeout: Duration,
    pub retry: RetryPolicy,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub accept_language: Option<String>,
    pub log_requests: bool,
    pub log_responses: bool,
}

impl ExecutorDefaults {
    pub fn from_configuration(config: &Configuration) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            connection_timeout: config.connection_timeout(),
            read_timeout: config.read_timeout(),
            retry: RetryPolicy::from_configuration(config),
            content_type: config.request_content_type(),
            accept: config.response_accept_type(),
            accept_language: config.response_language(),
            log_requests: config.log_requests(),
            log_responses: config.log_responses(),
        }
    }
}

/// Sends [`RequestSpec`]s with retry, returning a fresh [`ApiResponse`] per
/// call. Holds no per-request state and can be shared freely.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    defaults: ExecutorDefaults,
}

/// Everything that is computed once before the first attempt
struct PreparedRequest {
    method: reqwest::Method,
    url: Url,
    headers: HeaderMap,
    body: Option<String>,
    read_timeout: Duration,
    retry_on_error_status: bool,
    log_responses: bool,
}

impl RequestExecutor {
    pub fn new(config: &Configuration) -> ApiResult<Self> {
        Self::with_defaults(ExecutorDefaults::from_configuration(config))
    }

    pub fn with_defaults(defaults: ExecutorDefaults) -> ApiResult<Self> {
        let client = build_client(defaults.connection_timeout)?;
        Ok(Self { client, defaults })
    }

    /// Replace the retry policy, e.g. to count error statuses as failures
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.defaults.retry = retry;
        self
    }

    pub fn defaults(&self) -> &ExecutorDefaults {
        &self.defaults
    }

    pub fn base_url(&self) -> &str {
        &self.defaults.base_url
    }

    /// Join a resource path onto the configured base URL
    pub fn url(&self, path: &str) -> String {
        join_url(&self.defaults.base_url, path)
    }

    /// Send a request, retrying failed attempts without delay.
    ///
    /// URL, headers and body are validated before the first attempt; a
    /// failure there is returned directly and never retried.
    #[instrument(skip(self, spec), fields(method = %spec.method, url = %spec.url))]
    pub async fn execute(&self, spec: RequestSpec) -> ApiResult<ApiResponse> {
        let prepared = self.prepare(&spec)?;

        let client = match spec.connection_timeout {
            Some(timeout) if timeout != self.defaults.connection_timeout => build_client(timeout)?,
            _ => self.client.clone(),
        };
        let policy = match spec.retry_count {
            Some(count) => self.defaults.retry.with_attempts(count),
            None => self.defaults.retry,
        };

        if spec.verbose || self.defaults.log_requests {
            info!(
                headers = ?prepared.headers,
                body = prepared.body.as_deref().unwrap_or(""),
                attempts = policy.max_attempts,
                "Sending request"
            );
        } else {
            debug!(
                headers = ?prepared.headers,
                body = prepared.body.as_deref().unwrap_or(""),
                attempts = policy.max_attempts,
                "Sending request"
            );
        }

        let log_body = spec.verbose || prepared.log_responses;
        let client = &client;
        let prepared = &prepared;
        let response = policy
            .run(move |attempt| send_once(client, prepared, attempt))
            .await?;

        if log_body {
            info!(
                status = response.status_code(),
                elapsed_ms = response.elapsed().as_millis() as u64,
                body = %response.body_one_line(),
                "Received response"
            );
        } else {
            debug!(
                status = response.status_code(),
                elapsed_ms = response.elapsed().as_millis() as u64,
                "Received response"
            );
        }

        Ok(response)
    }

    fn prepare(&self, spec: &RequestSpec) -> ApiResult<PreparedRequest> {
        let url = if spec.url_encoding {
            let mut url = parse_url(&spec.url)?;
            if !spec.query.is_empty() {
                let mut pairs = url.query_pairs_mut();
                for (name, value) in &spec.query {
                    pairs.append_pair(name, value);
                }
            }
            url
        } else {
            parse_url(&spec.url_with_raw_query())?
        };

        let body = spec.body.as_ref().map(|b| b.to_text()).transpose()?;

        let mut headers = HeaderMap::new();
        if let Some(accept) = &self.defaults.accept {
            headers.insert(ACCEPT, header_value(accept)?);
        }
        if let Some(language) = &self.defaults.accept_language {
            headers.insert(ACCEPT_LANGUAGE, header_value(language)?);
        }

        let content_type = spec.content_type.clone().or_else(|| match &spec.body {
            Some(body) => self
                .defaults
                .content_type
                .clone()
                .or_else(|| body.is_json().then(|| JSON_CONTENT_TYPE.to_string())),
            None => None,
        });
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, header_value(&content_type)?);
        }

        for (name, value) in &spec.headers {
            headers.insert(header_name(name)?, header_value(value)?);
        }
        if let Some(authorization) = &spec.authorization {
            for (name, value) in authorization.headers() {
                headers.insert(header_name(&name)?, header_value(&value)?);
            }
        }

        Ok(PreparedRequest {
            method: spec.method.into(),
            url,
            headers,
            body,
            read_timeout: spec.read_timeout.unwrap_or(self.defaults.read_timeout),
            retry_on_error_status: self.defaults.retry.retry_on_error_status,
            log_responses: self.defaults.log_responses,
        })
    }
}

async fn send_once(client: &Client, prepared: &PreparedRequest, attempt: u32) -> ApiResult<ApiResponse> {
    let mut builder = client
        .request(prepared.method.clone(), prepared.url.clone())
        .headers(prepared.headers.clone())
        .timeout(prepared.read_timeout);
    if let Some(body) = &prepared.body {
        builder = builder.body(body.clone());
    }

    let started = Instant::now();
    let response = builder.send().await?;
    let response = ApiResponse::read(response, started.elapsed()).await?;
    debug!(attempt, status = response.status_code(), "Attempt completed");

    if prepared.retry_on_error_status && !response.is_success() {
        return Err(ApiError::UnexpectedStatus {
            status: response.status_code(),
            body: response.body_one_line(),
        });
    }
    Ok(response)
}

fn build_client(connection_timeout: Duration) -> ApiResult<Client> {
    // Test environments commonly serve self-signed certificates
    Ok(Client::builder()
        .connect_timeout(connection_timeout)
        .danger_accept_invalid_certs(true)
        .build()?)
}

fn parse_url(raw: &str) -> ApiResult<Url> {
    Url::parse(raw).map_err(|e| ApiError::InvalidRequest(format!("invalid URL '{raw}': {e}")))
}

fn header_name(name: &str) -> ApiResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ApiError::InvalidRequest(format!("invalid header name '{name}': {e}")))
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid header value '{value}': {e}")))
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
