use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use apirest_config::{Configuration, PropertyReader};
use tempfile::TempDir;

use crate::error::TestResult;
use crate::server::{KNOWN_PASSWORD, KNOWN_USER};

pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_CLIENT_SECRET: &str = "test-secret";
pub const TEST_TOKEN_USERNAME: &str = "token-user";
pub const TEST_TOKEN_PASSWORD: &str = "token-pass";

const ENVIRONMENTS: [&str; 3] = ["prod", "hml", "dev"];

/// Renders a properties file in which every environment points at one
/// base URL, usually a mock server.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub base_url: String,
    pub environment: String,
    pub retry_count: u32,
    pub connection_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub auth_type: String,
    pub token: String,
    pub extra: BTreeMap<String, String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9".to_string(),
            environment: "hml".to_string(),
            retry_count: 3,
            connection_timeout_ms: 1_000,
            read_timeout_ms: 2_000,
            auth_type: String::new(),
            token: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl TestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn read_timeout_ms(mut self, read_timeout_ms: u64) -> Self {
        self.read_timeout_ms = read_timeout_ms;
        self
    }

    pub fn auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = auth_type.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Properties text
    pub fn render(&self) -> String {
        let mut lines = vec![
            "# Generated test configuration".to_string(),
            format!("environment.active={}", self.environment),
            format!("connection.timeout={}", self.connection_timeout_ms),
            format!("read.timeout={}", self.read_timeout_ms),
            format!("retry.count={}", self.retry_count),
            format!("authe.type={}", self.auth_type),
            format!("test.username={KNOWN_USER}"),
            format!("test.password={KNOWN_PASSWORD}"),
        ];

        for env in ENVIRONMENTS {
            lines.push(format!("base.url.{env}={}", self.base_url));
            lines.push(format!("authe.{env}.client.id={TEST_CLIENT_ID}"));
            lines.push(format!("authe.{env}.client.secret={TEST_CLIENT_SECRET}"));
            lines.push(format!("authe.{env}.token.url={}", self.base_url));
            lines.push(format!("authe.{env}.token.username={TEST_TOKEN_USERNAME}"));
            lines.push(format!("authe.{env}.token.password={TEST_TOKEN_PASSWORD}"));
            lines.push(format!("authe.token.{env}={}", self.token));
        }

        for (key, value) in &self.extra {
            lines.push(format!("{key}={value}"));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Resolve without touching the filesystem
    pub fn configuration(&self) -> TestResult<Configuration> {
        Ok(Configuration::from_properties(PropertyReader::parse(&self.render()))?)
    }

    /// Write `configurations.properties` into `dir`
    pub fn write_to(&self, dir: &Path) -> TestResult<PathBuf> {
        let path = dir.join("configurations.properties");
        fs::write(&path, self.render())?;
        Ok(path)
    }

    /// Write into a fresh temporary directory, kept alive by the returned guard
    pub fn write_temp(&self) -> TestResult<(TempDir, PathBuf)> {
        let dir = TempDir::new()?;
        let path = self.write_to(dir.path())?;
        Ok((dir, path))
    }
}

/// Repository `resources/` directory holding the schema files
pub fn resource_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources")
}
