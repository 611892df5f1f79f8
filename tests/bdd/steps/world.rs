use apirest_client::models::AuthorizedPostRequest;
use apirest_client::services::{AccountService, BookstoreService};
use apirest_client::{
    ApiError, ApiResponse, AuthenticationClient, RequestExecutor, SchemaValidator, TokenGrant,
};
use apirest_config::Configuration;
use apirest_bdd_tests::{target, Target};
use apirest_test_utils::{resource_root, MockAccountApi};
use cucumber::World;

/// State shared by the steps of one scenario
#[derive(World)]
#[world(init = Self::default)]
pub struct ApiWorld {
    /// Mock API, absent when running against a live environment
    pub api: Option<MockAccountApi>,
    pub configuration: Option<Configuration>,
    pub executor: Option<RequestExecutor>,
    pub schemas: SchemaValidator,

    pub authorized_request: AuthorizedPostRequest,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub retry_on_error_status: bool,

    pub response: Option<ApiResponse>,
    pub error: Option<ApiError>,
    pub grant: Option<TokenGrant>,
}

impl Default for ApiWorld {
    fn default() -> Self {
        Self {
            api: None,
            configuration: None,
            executor: None,
            schemas: SchemaValidator::new(resource_root()),
            authorized_request: AuthorizedPostRequest::default(),
            headers: Vec::new(),
            query: Vec::new(),
            retry_on_error_status: false,
            response: None,
            error: None,
            grant: None,
        }
    }
}

impl ApiWorld {
    /// Start the mock API or load the live configuration
    pub async fn connect(&mut self) -> Result<(), String> {
        let configuration = match target() {
            Target::Live(configuration) => configuration.clone(),
            Target::Mock => {
                let api = MockAccountApi::start().await;
                let configuration = api.test_config().configuration().map_err(|e| e.to_string())?;
                self.api = Some(api);
                configuration
            }
        };

        self.executor = Some(RequestExecutor::new(&configuration).map_err(|e| e.to_string())?);
        self.configuration = Some(configuration);
        Ok(())
    }

    pub fn api(&self) -> &MockAccountApi {
        self.api
            .as_ref()
            .expect("this step needs the mock API; run without --live")
    }

    pub fn configuration(&self) -> &Configuration {
        self.configuration
            .as_ref()
            .expect("scenario setup did not load a configuration")
    }

    /// Executor for this scenario, honouring the retry-on-status toggle
    pub fn executor(&self) -> RequestExecutor {
        let executor = self
            .executor
            .clone()
            .expect("scenario setup did not create an executor");
        if self.retry_on_error_status {
            let policy = executor.defaults().retry.with_retry_on_error_status(true);
            executor.with_retry_policy(policy)
        } else {
            executor
        }
    }

    pub fn account(&self) -> AccountService {
        AccountService::new(self.executor(), self.schemas.clone())
            .with_configuration(self.configuration())
    }

    pub fn bookstore(&self) -> BookstoreService {
        BookstoreService::new(self.executor()).with_configuration(self.configuration())
    }

    pub fn authentication(&self) -> AuthenticationClient {
        AuthenticationClient::new(self.executor(), self.configuration())
    }

    /// Store the outcome of a call
    pub fn record(&mut self, result: Result<ApiResponse, ApiError>) {
        match result {
            Ok(response) => {
                self.response = Some(response);
                self.error = None;
            }
            Err(error) => {
                self.response = None;
                self.error = Some(error);
            }
        }
    }

    pub fn response(&self) -> &ApiResponse {
        match (&self.response, &self.error) {
            (Some(response), _) => response,
            (None, Some(error)) => panic!("request failed: {error}"),
            (None, None) => panic!("no request has been sent"),
        }
    }

    pub fn grant(&self) -> &TokenGrant {
        self.grant.as_ref().expect("no token has been requested")
    }
}

// Manual Debug implementation since MockAccountApi doesn't implement Debug
impl std::fmt::Debug for ApiWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiWorld")
            .field("api", &self.api.as_ref().map(|api| api.uri()))
            .field("configuration", &self.configuration)
            .field("executor", &self.executor)
            .field("schemas", &self.schemas)
            .field("authorized_request", &self.authorized_request)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("retry_on_error_status", &self.retry_on_error_status)
            .field("response", &self.response)
            .field("error", &self.error)
            .field("grant", &self.grant)
            .finish()
    }
}
