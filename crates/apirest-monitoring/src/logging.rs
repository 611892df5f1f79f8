//! Structured logging module using tracing.
//!
//! Installs a global subscriber with an env filter, a pretty or JSON stdout
//! layer and, when a log directory is configured, a daily rolling JSON file.

use std::path::PathBuf;

use anyhow::Context;
use apirest_config::Configuration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Filter used when neither `RUST_LOG` nor `log.level` is set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Name attached to the startup event
    pub service_name: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// JSON lines on stdout instead of the pretty format
    pub enable_json_logging: bool,
    /// Directory for the rolling log file; no file when `None`
    pub log_directory: Option<PathBuf>,
    /// File name prefix inside `log_directory`
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "apirest".to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            enable_json_logging: false,
            log_directory: None,
            file_prefix: "apirest.log".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Take `log.level` and `log.directory` from the harness configuration
    pub fn from_configuration(config: &Configuration) -> Self {
        Self {
            log_filter: config
                .log_level()
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_directory: config.log_directory(),
            ..Default::default()
        }
    }
}

/// Initialize structured logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter '{}'", config.log_filter))?;

    let stdout_layer = if config.enable_json_logging {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = config.log_directory.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(appender)
            .boxed()
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    info!(
        service_name = %config.service_name,
        log_format = if config.enable_json_logging { "json" } else { "pretty" },
        log_directory = ?config.log_directory,
        "Logging initialized"
    );

    Ok(())
}

/// Trait to add log context to results
pub trait LogExt<T, E> {
    /// Log error with additional context before returning
    fn log_err(self, message: &str) -> Result<T, E>;

    /// Log success with additional context before returning
    fn log_ok(self, message: &str) -> Result<T, E>;
}

impl<T, E: std::fmt::Display> LogExt<T, E> for Result<T, E> {
    fn log_err(self, message: &str) -> Result<T, E> {
        if let Err(ref e) = self {
            tracing::error!("{}: {}", message, e);
        }
        self
    }

    fn log_ok(self, message: &str) -> Result<T, E> {
        if self.is_ok() {
            tracing::info!("{}", message);
        }
        self
    }
}

/// Install a test-writer subscriber; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_target(false)
        .with_test_writer()
        .try_init();
}
