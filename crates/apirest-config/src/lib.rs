//! Configuration for the apirest harness.
//!
//! Reads a flat properties file, selects the active deployment environment
//! and exposes the resolved settings (base URL, credentials, timeouts, retry
//! count) through a read-only [`Configuration`].

pub mod configuration;
pub mod environment;
pub mod error;
pub mod properties;
pub mod runner;

pub use configuration::Configuration;
pub use environment::{Environment, EnvironmentConfig};
pub use error::{ConfigError, ConfigResult};
pub use properties::PropertyReader;
pub use runner::RunnerKind;
