//! Token endpoint client.
//!
//! Posts credentials to `<token url>/api/auth/token` and exposes the token
//! fields under the names the various identity providers use for them.

use apirest_config::Configuration;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiResult};
use crate::executor::{join_url, RequestExecutor};
use crate::request::{
    Authorization, RequestSpec, DEFAULT_CLIENT_ID_HEADER, DEFAULT_CLIENT_SECRET_HEADER,
};
use crate::response::ApiResponse;

pub const TOKEN_ENDPOINT: &str = "/api/auth/token";

/// Token fields, accepting the common aliases for each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(
        rename = "accessToken",
        alias = "token",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub access_token: Option<String>,

    #[serde(
        rename = "tokenType",
        alias = "type",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub token_type: Option<String>,

    #[serde(
        rename = "expires",
        alias = "expiration",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub expires: Option<String>,

    #[serde(default, deserialize_with = "scalar_as_string")]
    pub status: Option<String>,

    #[serde(
        rename = "result",
        alias = "output",
        default,
        deserialize_with = "scalar_as_string"
    )]
    pub result: Option<String>,
}

/// Keep any JSON scalar as text; `null` becomes `None`
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Header names used to send the client credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentialHeaders {
    pub id: String,
    pub secret: String,
}

impl Default for ClientCredentialHeaders {
    fn default() -> Self {
        Self {
            id: DEFAULT_CLIENT_ID_HEADER.to_string(),
            secret: DEFAULT_CLIENT_SECRET_HEADER.to_string(),
        }
    }
}

/// Shape of the token request body and headers.
///
/// By default the configured username and password are sent as `username`
/// and `password` with no client headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub username_field: String,
    pub password_field: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_headers: Option<ClientCredentialHeaders>,
}

impl Default for TokenRequest {
    fn default() -> Self {
        Self {
            username_field: "username".to_string(),
            password_field: "password".to_string(),
            username: None,
            password: None,
            client_headers: None,
        }
    }
}

impl TokenRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the body fields
    pub fn fields(mut self, username_field: impl Into<String>, password_field: impl Into<String>) -> Self {
        self.username_field = username_field.into();
        self.password_field = password_field.into();
        self
    }

    /// Send these values instead of the configured credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Add the configured client id/secret under the default header names
    pub fn with_client_credentials(mut self) -> Self {
        self.client_headers = Some(ClientCredentialHeaders::default());
        self
    }

    pub fn client_credential_headers(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.client_headers = Some(ClientCredentialHeaders {
            id: id.into(),
            secret: secret.into(),
        });
        self
    }
}

/// A token response together with the configured overrides
#[derive(Debug, Clone)]
pub struct TokenGrant {
    response: ApiResponse,
    token: TokenResponse,
    configured_token: String,
    configured_type: String,
}

impl TokenGrant {
    pub fn response(&self) -> &ApiResponse {
        &self.response
    }

    pub fn token(&self) -> &TokenResponse {
        &self.token
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.access_token.as_deref()
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token.token_type.as_deref()
    }

    pub fn expires(&self) -> Option<&str> {
        self.token.expires.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.token.status.as_deref()
    }

    pub fn result(&self) -> Option<&str> {
        self.token.result.as_deref()
    }

    /// `"<type> <token>"`. A non-blank configured token or type wins over
    /// the value in the response.
    pub fn authorization_value(&self) -> ApiResult<String> {
        let token = pick(&self.configured_token, self.access_token())
            .ok_or_else(|| ApiError::Assertion("token response has no access token".into()))?;
        let kind = pick(&self.configured_type, self.token_type())
            .ok_or_else(|| ApiError::Assertion("token response has no token type".into()))?;
        Ok(format!("{kind} {token}"))
    }

    pub fn authorization(&self) -> ApiResult<Authorization> {
        self.authorization_value().map(Authorization::Header)
    }
}

fn pick<'a>(configured: &'a str, received: Option<&'a str>) -> Option<&'a str> {
    if !configured.trim().is_empty() {
        Some(configured)
    } else {
        received.filter(|v| !v.trim().is_empty())
    }
}

/// Requests tokens for the active environment.
#[derive(Debug, Clone)]
pub struct AuthenticationClient {
    executor: RequestExecutor,
    token_url: String,
    configured_token: String,
    configured_type: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl AuthenticationClient {
    pub fn new(executor: RequestExecutor, config: &Configuration) -> Self {
        Self {
            executor,
            token_url: config.token_url().to_string(),
            configured_token: config.token().to_string(),
            configured_type: config.auth_type(),
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().to_string(),
            username: config.token_username().to_string(),
            password: config.token_password().to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        join_url(&self.token_url, TOKEN_ENDPOINT)
    }

    #[instrument(skip(self, request), fields(url = %self.endpoint()))]
    pub async fn generate_token(&self, request: &TokenRequest) -> ApiResult<TokenGrant> {
        let mut body = Map::new();
        body.insert(
            request.username_field.clone(),
            Value::String(request.username.clone().unwrap_or_else(|| self.username.clone())),
        );
        body.insert(
            request.password_field.clone(),
            Value::String(request.password.clone().unwrap_or_else(|| self.password.clone())),
        );

        let mut spec = RequestSpec::post(self.endpoint()).map_body(body);
        if let Some(names) = &request.client_headers {
            spec = spec.authorization(Authorization::ClientCredentials {
                id_header: names.id.clone(),
                client_id: self.client_id.clone(),
                secret_header: names.secret.clone(),
                client_secret: self.client_secret.clone(),
            });
        }

        let response = self.executor.execute(spec).await?;
        if !response.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: response.status_code(),
                body: response.body_one_line(),
            });
        }

        let token: TokenResponse = response.deserialize()?;
        info!(
            token_type = token.token_type.as_deref().unwrap_or(""),
            expires = token.expires.as_deref().unwrap_or(""),
            "Token generated"
        );

        Ok(TokenGrant {
            response,
            token,
            configured_token: self.configured_token.clone(),
            configured_type: self.configured_type.clone(),
        })
    }
}
