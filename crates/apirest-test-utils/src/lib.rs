//! Testing utilities for the apirest harness.
//!
//! A wiremock server standing in for the APIs under test, and configuration
//! fixtures that point every environment at it.

pub mod config;
pub mod error;
pub mod server;

pub use config::{resource_root, TestConfig};
pub use error::{TestError, TestResult};
pub use server::MockAccountApi;
