//! Observability for the apirest harness.

pub mod logging;

pub use logging::{init_logging, init_test_tracing, LogExt, LoggingConfig};
