//! Endpoint wrappers built on [`RequestExecutor`](crate::RequestExecutor).

pub mod account;
pub mod bookstore;

pub use account::AccountService;
pub use bookstore::BookstoreService;

use apirest_config::Configuration;

/// `endpoint.<name>` from the configuration, or `default` when blank
pub(crate) fn endpoint_or(config: &Configuration, name: &str, default: &str) -> String {
    let configured = config.endpoint(name);
    let configured = configured.trim();
    if configured.is_empty() {
        default.to_string()
    } else {
        configured.to_string()
    }
}
