//! Wiremock stand-in for the Account, Bookstore and token APIs.

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{TestConfig, TEST_TOKEN_PASSWORD, TEST_TOKEN_USERNAME};

pub const KNOWN_USER: &str = "apirest.user";
pub const KNOWN_PASSWORD: &str = "Secret@123";
pub const USER_ID: &str = "3f1c2a7e-5b8d-4c6e-9a0f-1d2e3f4a5b6c";
pub const ACCESS_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.dGVzdA.c2lnbmF0dXJl";
pub const TOKEN_TYPE: &str = "Bearer";
pub const TOKEN_EXPIRES: &str = "2030-01-01T00:00:00Z";
pub const GIT_POCKET_GUIDE: &str = "9781449325862";
pub const LEARNING_JS_PATTERNS: &str = "9781449331818";

fn book(isbn: &str, title: &str, pages: u32) -> Value {
    json!({
        "isbn": isbn,
        "title": title,
        "subTitle": "",
        "author": "O'Reilly Author",
        "publish_date": "2020-06-04T08:48:39.000Z",
        "publisher": "O'Reilly Media",
        "pages": pages,
        "description": "",
        "website": "https://example.test/book"
    })
}

pub fn catalog() -> Value {
    json!({
        "books": [
            book(GIT_POCKET_GUIDE, "Git Pocket Guide", 234),
            book(LEARNING_JS_PATTERNS, "Learning JavaScript Design Patterns", 254)
        ]
    })
}

/// Running mock API.
pub struct MockAccountApi {
    server: MockServer,
}

impl MockAccountApi {
    /// Start a server with every endpoint mounted
    pub async fn start() -> Self {
        let api = Self::start_empty().await;
        api.mount_defaults().await;
        api
    }

    /// Start a server with nothing mounted; every request gets 404
    pub async fn start_empty() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Configuration pointing at this server
    pub fn test_config(&self) -> TestConfig {
        TestConfig::new(self.uri())
    }

    /// Number of requests received for an exact path
    pub async fn request_count(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }

    /// Answer `verb request_path` with a fixed status
    pub async fn mount_status(&self, verb: &str, request_path: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answer the first `times` requests with `status`, the rest with 200
    /// and `body`
    pub async fn mount_flaky(&self, verb: &str, request_path: &str, status: u16, times: u64, body: Value) {
        Mock::given(method(verb))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
        Mock::given(method(verb))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_defaults(&self) {
        self.mount_token().await;
        self.mount_authorized().await;
        self.mount_user().await;
        self.mount_generate_token().await;
        self.mount_bookstore().await;
    }

    async fn mount_token(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .and(body_json(json!({
                "username": TEST_TOKEN_USERNAME,
                "password": TEST_TOKEN_PASSWORD
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": ACCESS_TOKEN,
                "tokenType": TOKEN_TYPE,
                "expires": TOKEN_EXPIRES,
                "status": "Success",
                "result": "Token issued"
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "message": "Invalid credentials"
            })))
            .mount(&self.server)
            .await;
    }

    async fn mount_authorized(&self) {
        Mock::given(method("POST"))
            .and(path("/Account/v1/Authorized"))
            .and(body_json(json!({"userName": KNOWN_USER, "password": KNOWN_PASSWORD})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/Account/v1/Authorized"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "1207",
                "message": "User not found!"
            })))
            .mount(&self.server)
            .await;
    }

    async fn mount_user(&self) {
        let bearer = format!("{TOKEN_TYPE} {ACCESS_TOKEN}");

        Mock::given(method("POST"))
            .and(path("/Account/v1/User"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "userID": USER_ID,
                "username": KNOWN_USER,
                "books": []
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/Account/v1/User/{USER_ID}")))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": USER_ID,
                "username": KNOWN_USER,
                "books": [book(GIT_POCKET_GUIDE, "Git Pocket Guide", 234)]
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(format!("/Account/v1/User/{USER_ID}")))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;

        Mock::given(path_regex(r"^/Account/v1/User/.+$"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "1200",
                "message": "User not authorized!"
            })))
            .mount(&self.server)
            .await;
    }

    async fn mount_generate_token(&self) {
        Mock::given(method("POST"))
            .and(path("/Account/v1/GenerateToken"))
            .and(body_json(json!({"userName": KNOWN_USER, "password": KNOWN_PASSWORD})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": ACCESS_TOKEN,
                "expires": TOKEN_EXPIRES,
                "status": "Success",
                "result": "User authorized successfully."
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/Account/v1/GenerateToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": null,
                "expires": null,
                "status": "Failed",
                "result": "User authorization failed."
            })))
            .mount(&self.server)
            .await;
    }

    async fn mount_bookstore(&self) {
        let bearer = format!("{TOKEN_TYPE} {ACCESS_TOKEN}");

        Mock::given(method("GET"))
            .and(path("/BookStore/v1/Books"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/BookStore/v1/Book"))
            .and(query_param("ISBN", GIT_POCKET_GUIDE))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(book(GIT_POCKET_GUIDE, "Git Pocket Guide", 234)),
            )
            .mount(&self.server)
            .await;

        Mock::given(method("POST"))
            .and(path("/BookStore/v1/Books"))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "books": [{"isbn": GIT_POCKET_GUIDE}]
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("PUT"))
            .and(path_regex(r"^/BookStore/v1/Books/\d+$"))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": USER_ID,
                "username": KNOWN_USER,
                "books": [book(LEARNING_JS_PATTERNS, "Learning JavaScript Design Patterns", 254)]
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/BookStore/v1/Books"))
            .and(query_param("UserId", USER_ID))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;

        Mock::given(path_regex(r"^/BookStore/v1/Books"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "1200",
                "message": "User not authorized!"
            })))
            .mount(&self.server)
            .await;
    }
}
