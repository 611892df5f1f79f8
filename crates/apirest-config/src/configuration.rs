//! Resolved harness configuration.
//!
//! Built once from a properties source and read-only afterwards. The active
//! environment is selected at construction and every per-environment value is
//! copied into an [`EnvironmentConfig`]; numeric settings are parsed eagerly
//! so a malformed value stops the run before any request is sent.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use crate::environment::{Environment, EnvironmentConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::properties::PropertyReader;
use crate::runner::RunnerKind;

/// Environment variable that points at an alternative properties file
pub const CONFIG_ENV_VAR: &str = "APIREST_CONFIG";

/// Location used when [`CONFIG_ENV_VAR`] is unset
pub const DEFAULT_CONFIG_PATH: &str = "resources/configurations.properties";

pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_COUNT: u32 = 3;

pub mod keys {
    pub const ENVIRONMENT_ACTIVE: &str = "environment.active";
    pub const AUTHE_TYPE: &str = "authe.type";
    pub const CONNECTION_TIMEOUT: &str = "connection.timeout";
    pub const READ_TIMEOUT: &str = "read.timeout";
    pub const RETRY_COUNT: &str = "retry.count";
    pub const REQUEST_CONTENT_TYPE: &str = "request.content.type";
    pub const RESPONSE_ACCEPT_TYPE: &str = "response.accept.type";
    pub const RESPONSE_LANGUAGE: &str = "response.language";
    pub const LOG_REQUESTS: &str = "log.requests";
    pub const LOG_RESPONSES: &str = "log.responses";
    pub const LOG_DIRECTORY: &str = "log.directory";
    pub const LOG_LEVEL: &str = "log.level";
    pub const TEST_USERNAME: &str = "test.username";
    pub const TEST_PASSWORD: &str = "test.password";
    pub const RUNNER_EXECUTION_TEST: &str = "runner.execution.test";
}

/// Harness configuration resolved for one environment.
#[derive(Debug, Clone)]
pub struct Configuration {
    properties: PropertyReader,
    environment: EnvironmentConfig,
    connection_timeout: Duration,
    read_timeout: Duration,
    retry_count: u32,
}

impl Configuration {
    /// Load and resolve a properties file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let properties = PropertyReader::load(path.as_ref())?;
        Self::from_properties(properties)
    }

    /// Load from `$APIREST_CONFIG` or [`DEFAULT_CONFIG_PATH`].
    ///
    /// A missing file is logged and resolved as an empty property set, so
    /// every string setting is empty and numeric settings take their
    /// defaults. A file that exists but cannot be parsed into valid numbers
    /// is still an error.
    pub fn from_default_location() -> ConfigResult<Self> {
        let path = env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        match PropertyReader::load(&path) {
            Ok(properties) => Self::from_properties(properties),
            Err(ConfigError::Io { path, source }) => {
                error!(path = %path.display(), error = %source, "Failed to load properties file");
                Self::from_properties(PropertyReader::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the active environment and parse the numeric settings
    pub fn from_properties(properties: PropertyReader) -> ConfigResult<Self> {
        let environment = Environment::resolve(&properties.property(keys::ENVIRONMENT_ACTIVE));
        let environment = EnvironmentConfig::resolve(&properties, environment);

        let connection_timeout = parse_millis(
            &properties,
            keys::CONNECTION_TIMEOUT,
            DEFAULT_CONNECTION_TIMEOUT_MS,
        )?;
        let read_timeout = parse_millis(&properties, keys::READ_TIMEOUT, DEFAULT_READ_TIMEOUT_MS)?;
        let retry_count = parse_retry_count(&properties)?;

        info!(
            environment = %environment.environment,
            base_url = %environment.base_url,
            retry_count,
            "Configuration resolved"
        );

        Ok(Self {
            properties,
            environment,
            connection_timeout,
            read_timeout,
            retry_count,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment.environment
    }

    pub fn environment_config(&self) -> &EnvironmentConfig {
        &self.environment
    }

    pub fn base_url(&self) -> &str {
        &self.environment.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.environment.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.environment.client_secret
    }

    pub fn token_url(&self) -> &str {
        &self.environment.token_url
    }

    pub fn token_username(&self) -> &str {
        &self.environment.token_username
    }

    pub fn token_password(&self) -> &str {
        &self.environment.token_password
    }

    /// Literal token configured for the active environment
    pub fn token(&self) -> &str {
        &self.environment.token
    }

    /// Token type prefix, e.g. `Bearer`
    pub fn auth_type(&self) -> String {
        self.properties.property(keys::AUTHE_TYPE)
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn request_content_type(&self) -> Option<String> {
        self.non_blank(keys::REQUEST_CONTENT_TYPE)
    }

    pub fn response_accept_type(&self) -> Option<String> {
        self.non_blank(keys::RESPONSE_ACCEPT_TYPE)
    }

    pub fn response_language(&self) -> Option<String> {
        self.non_blank(keys::RESPONSE_LANGUAGE)
    }

    pub fn log_requests(&self) -> bool {
        self.flag(keys::LOG_REQUESTS)
    }

    pub fn log_responses(&self) -> bool {
        self.flag(keys::LOG_RESPONSES)
    }

    pub fn log_directory(&self) -> Option<PathBuf> {
        self.non_blank(keys::LOG_DIRECTORY).map(PathBuf::from)
    }

    pub fn log_level(&self) -> Option<String> {
        self.non_blank(keys::LOG_LEVEL)
    }

    pub fn test_username(&self) -> String {
        self.properties.property(keys::TEST_USERNAME)
    }

    pub fn test_password(&self) -> String {
        self.properties.property(keys::TEST_PASSWORD)
    }

    /// Endpoint path configured under `endpoint.<name>`
    pub fn endpoint(&self, name: &str) -> String {
        self.properties.property(&format!("endpoint.{name}"))
    }

    /// Report format for the feature run. Unknown names are an error here
    /// rather than at load time, so only the runner binary rejects them.
    pub fn runner(&self) -> ConfigResult<RunnerKind> {
        RunnerKind::resolve(&self.properties.property(keys::RUNNER_EXECUTION_TEST))
    }

    /// Raw property access for keys without a dedicated accessor
    pub fn property(&self, key: &str) -> String {
        self.properties.property(key)
    }

    fn non_blank(&self, key: &str) -> Option<String> {
        let value = self.properties.property(key);
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.properties.property(key).trim().eq_ignore_ascii_case("true")
    }
}

fn parse_millis(properties: &PropertyReader, key: &str, default_ms: u64) -> ConfigResult<Duration> {
    let raw = properties.property(key);
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Duration::from_millis(default_ms));
    }

    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        })
}

fn parse_retry_count(properties: &PropertyReader) -> ConfigResult<u32> {
    let raw = properties.property(keys::RETRY_COUNT);
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_RETRY_COUNT);
    }

    let count = raw.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
        key: keys::RETRY_COUNT.to_string(),
        value: raw.to_string(),
    })?;

    if count == 0 {
        return Err(ConfigError::InvalidValue {
            key: keys::RETRY_COUNT.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(count)
}
