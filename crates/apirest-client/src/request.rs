//! Request description passed to the executor.
//!
//! One [`RequestSpec`] covers every verb and every combination of headers,
//! query parameters, body, authorization and timeouts. Unset fields fall back
//! to the executor defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// Header name used for client id in the client-credentials variant
pub const DEFAULT_CLIENT_ID_HEADER: &str = "client_id";
/// Header name used for client secret in the client-credentials variant
pub const DEFAULT_CLIENT_SECRET_HEADER: &str = "client_secret";

/// HTTP verb of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            other => Err(ApiError::InvalidRequest(format!("Invalid HTTP method: {other}"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as-is
    Raw(String),
    /// Flat key/value map serialized to a JSON object. Values are written as
    /// they are; nested maps are not walked.
    Map(Map<String, Value>),
    /// Pre-built JSON document
    Json(Value),
}

impl RequestBody {
    /// Serialize a typed model into a JSON body
    pub fn from_model<T: Serialize>(model: &T) -> ApiResult<Self> {
        serde_json::to_value(model)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }

    /// Text sent on the wire
    pub fn to_text(&self) -> ApiResult<String> {
        match self {
            RequestBody::Raw(text) => Ok(text.clone()),
            RequestBody::Map(map) => {
                serde_json::to_string(map).map_err(|e| ApiError::Serialization(e.to_string()))
            }
            RequestBody::Json(value) => {
                serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
            }
        }
    }

    /// Whether the body is JSON produced by this crate
    pub fn is_json(&self) -> bool {
        !matches!(self, RequestBody::Raw(_))
    }
}

/// Authorization attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Complete `Authorization` header value
    Header(String),
    /// `Authorization: <kind> <token>`
    Typed { kind: String, token: String },
    /// OAuth client id and secret sent as headers
    ClientCredentials {
        id_header: String,
        client_id: String,
        secret_header: String,
        client_secret: String,
    },
}

impl Authorization {
    pub fn typed(kind: impl Into<String>, token: impl Into<String>) -> Self {
        Authorization::Typed {
            kind: kind.into(),
            token: token.into(),
        }
    }

    /// Client credentials under the default `client_id`/`client_secret` headers
    pub fn client_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Authorization::ClientCredentials {
            id_header: DEFAULT_CLIENT_ID_HEADER.to_string(),
            client_id: client_id.into(),
            secret_header: DEFAULT_CLIENT_SECRET_HEADER.to_string(),
            client_secret: client_secret.into(),
        }
    }

    /// Headers this authorization adds to the request
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            Authorization::Header(value) => vec![("Authorization".to_string(), value.clone())],
            Authorization::Typed { kind, token } => {
                vec![("Authorization".to_string(), format!("{kind} {token}"))]
            }
            Authorization::ClientCredentials {
                id_header,
                client_id,
                secret_header,
                client_secret,
            } => vec![
                (id_header.clone(), client_id.clone()),
                (secret_header.clone(), client_secret.clone()),
            ],
        }
    }
}

/// A single HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: Option<RequestBody>,
    pub authorization: Option<Authorization>,
    pub content_type: Option<String>,
    /// Percent-encode query parameters; when off they are appended verbatim
    pub url_encoding: bool,
    /// Log the full request and response at `info`
    pub verbose: bool,
    pub connection_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub retry_count: Option<u32>,
}

impl RequestSpec {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
            authorization: None,
            content_type: None,
            url_encoding: true,
            verbose: false,
            connection_timeout: None,
            read_timeout: None,
            retry_count: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::Head, url)
    }

    pub fn options(url: impl Into<String>) -> Self {
        Self::new(Method::Options, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(name.into(), value.to_string());
        self
    }

    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn raw_body(self, body: impl Into<String>) -> Self {
        self.body(RequestBody::Raw(body.into()))
    }

    pub fn map_body(self, body: Map<String, Value>) -> Self {
        self.body(RequestBody::Map(body))
    }

    pub fn json_body(self, body: Value) -> Self {
        self.body(RequestBody::Json(body))
    }

    pub fn authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Pre-built `Authorization` header value
    pub fn authorization_header(self, value: impl Into<String>) -> Self {
        self.authorization(Authorization::Header(value.into()))
    }

    /// `Authorization: <kind> <token>`
    pub fn bearer(self, kind: impl Into<String>, token: impl Into<String>) -> Self {
        self.authorization(Authorization::typed(kind, token))
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn url_encoding(mut self, enabled: bool) -> Self {
        self.url_encoding = enabled;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// URL with query parameters appended verbatim. Used when URL encoding is
    /// disabled so already-encoded values are not encoded twice.
    pub(crate) fn url_with_raw_query(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, query)
    }
}
