//! Support code shared by the BDD test binary and the `apirest-runner` CLI.
//!
//! ```bash
//! # Run every feature against the mock API
//! cargo test --test bdd
//!
//! # Run against the environment selected in resources/configurations.properties
//! cargo run --bin apirest-runner -- --live
//! ```
//!
//! Step definitions live in `steps/` and are compiled into each binary.

use std::path::PathBuf;
use std::sync::OnceLock;

use apirest_config::Configuration;

/// Tag marking scenarios that need the mock API
pub const MOCK_ONLY_TAG: &str = "mock";

/// Where scenarios send their requests
#[derive(Debug, Clone)]
pub enum Target {
    /// A fresh mock server per scenario
    Mock,
    /// The environment described by a loaded configuration
    Live(Configuration),
}

static TARGET: OnceLock<Target> = OnceLock::new();

/// Select the target for this process. Only the first call has an effect.
pub fn set_target(target: Target) -> bool {
    TARGET.set(target).is_ok()
}

pub fn target() -> &'static Target {
    TARGET.get_or_init(|| Target::Mock)
}

pub fn is_live() -> bool {
    matches!(target(), Target::Live(_))
}

/// Feature files shipped with this crate
pub fn features_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("features")
}

/// Utility functions for BDD tests
pub mod utils {
    use std::collections::HashMap;

    /// Helper to parse a table from Cucumber into a Vector of HashMaps
    pub fn parse_table(table: &cucumber::gherkin::Table) -> Vec<HashMap<String, String>> {
        let headers = table.rows.first().cloned().unwrap_or_default();

        table
            .rows
            .iter()
            .skip(1)
            .map(|row| {
                headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<HashMap<_, _>>()
            })
            .collect()
    }

    /// Single-row table as key/value pairs: `| key | value |`
    pub fn parse_pairs(table: &cucumber::gherkin::Table) -> Vec<(String, String)> {
        table
            .rows
            .iter()
            .filter_map(|row| match row.as_slice() {
                [key, value, ..] => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}
