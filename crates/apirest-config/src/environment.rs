//! Deployment environment selection.
//!
//! Every per-environment setting follows the same key template with the
//! environment suffix substituted, so one table covers PROD, HML and DEV.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::properties::PropertyReader;

/// Environment used when `environment.active` is blank or unknown
pub const DEFAULT_ENVIRONMENT: Environment = Environment::Hml;

/// The deployment environment the harness points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    Prod,
    Hml,
    Dev,
}

impl Environment {
    /// Resolve a raw `environment.active` value. All whitespace is removed and
    /// the comparison ignores case; blank or unknown values select HML.
    pub fn resolve(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        match normalized.as_str() {
            "" => DEFAULT_ENVIRONMENT,
            "PROD" => Environment::Prod,
            "HML" => Environment::Hml,
            "DEV" => Environment::Dev,
            other => {
                warn!(environment = other, "Unknown environment, falling back to HML");
                DEFAULT_ENVIRONMENT
            }
        }
    }

    /// Lower-case suffix used in property keys (`base.url.<suffix>`)
    pub fn key_suffix(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Hml => "hml",
            Environment::Dev => "dev",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        DEFAULT_ENVIRONMENT
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_suffix().to_uppercase())
    }
}

/// Which resolved field a key template populates.
#[derive(Debug, Clone, Copy)]
enum Field {
    BaseUrl,
    ClientId,
    ClientSecret,
    TokenUrl,
    TokenUsername,
    TokenPassword,
    Token,
}

/// Key templates; `{env}` is replaced by [`Environment::key_suffix`].
const KEY_TABLE: &[(Field, &str)] = &[
    (Field::BaseUrl, "base.url.{env}"),
    (Field::ClientId, "authe.{env}.client.id"),
    (Field::ClientSecret, "authe.{env}.client.secret"),
    (Field::TokenUrl, "authe.{env}.token.url"),
    (Field::TokenUsername, "authe.{env}.token.username"),
    (Field::TokenPassword, "authe.{env}.token.password"),
    (Field::Token, "authe.token.{env}"),
];

/// Settings resolved for the active environment. Missing keys are empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub environment: Environment,
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub token_username: String,
    pub token_password: String,
    /// Literal token configured for the environment, if any
    pub token: String,
}

impl EnvironmentConfig {
    /// Populate every field for `environment` from the key table.
    pub fn resolve(properties: &PropertyReader, environment: Environment) -> Self {
        let mut config = Self {
            environment,
            ..Default::default()
        };

        for (field, template) in KEY_TABLE {
            let key = template.replace("{env}", environment.key_suffix());
            let value = properties.property(&key);
            let slot = match field {
                Field::BaseUrl => &mut config.base_url,
                Field::ClientId => &mut config.client_id,
                Field::ClientSecret => &mut config.client_secret,
                Field::TokenUrl => &mut config.token_url,
                Field::TokenUsername => &mut config.token_username,
                Field::TokenPassword => &mut config.token_password,
                Field::Token => &mut config.token,
            };
            *slot = value;
        }

        config
    }
}
