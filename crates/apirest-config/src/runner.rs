//! Report format selected by `runner.execution.test`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Runner name used when the key is blank
pub const DEFAULT_RUNNER: &str = "junit4";

/// How the feature run is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerKind {
    /// Console output only
    Basic,
    /// JUnit XML report, consumed by CI test tabs
    JUnit,
    /// Cucumber JSON report, consumed by Cluecumber and the Jenkins plugin
    Json,
}

impl RunnerKind {
    /// Resolve a raw property value; blank selects [`DEFAULT_RUNNER`].
    pub fn resolve(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            DEFAULT_RUNNER.parse()
        } else {
            trimmed.parse()
        }
    }

    /// File name of the report this runner writes, if any
    pub fn report_file_name(&self) -> Option<&'static str> {
        match self {
            RunnerKind::Basic => None,
            RunnerKind::JUnit => Some("junit.xml"),
            RunnerKind::Json => Some("cucumber.json"),
        }
    }
}

impl FromStr for RunnerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "console" => Ok(RunnerKind::Basic),
            "junit" | "junit4" | "junit5" | "testng" | "testng-extent" => Ok(RunnerKind::JUnit),
            "json" | "cluecumber" | "jenkins" | "serenity" => Ok(RunnerKind::Json),
            other => Err(ConfigError::UnsupportedRunner(other.to_string())),
        }
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunnerKind::Basic => "basic",
            RunnerKind::JUnit => "junit",
            RunnerKind::Json => "json",
        };
        f.write_str(name)
    }
}
