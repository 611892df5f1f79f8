//! HTTP side of the apirest harness.
//!
//! [`RequestExecutor`] sends a [`RequestSpec`] with retry and returns an
//! [`ApiResponse`]. [`SchemaValidator`] checks bodies against JSON Schema
//! files, [`AuthenticationClient`] fetches tokens, and the [`services`]
//! module wraps the Account and Bookstore endpoints.

pub mod auth;
pub mod error;
pub mod executor;
pub mod models;
pub mod request;
pub mod response;
pub mod retry;
pub mod schema;
pub mod services;

pub use auth::{AuthenticationClient, TokenGrant, TokenRequest, TokenResponse};
pub use error::{ApiError, ApiResult};
pub use executor::{ExecutorDefaults, RequestExecutor};
pub use request::{Authorization, Method, RequestBody, RequestSpec};
pub use response::ApiResponse;
pub use retry::RetryPolicy;
pub use schema::{SchemaLocator, SchemaReport, SchemaValidator};
