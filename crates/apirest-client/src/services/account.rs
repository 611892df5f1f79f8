use apirest_config::Configuration;
use tracing::{error, info};

use crate::error::ApiResult;
use crate::executor::RequestExecutor;
use crate::models::{
    AuthorizedPostRequest, AuthorizedPostSuccessResponse, GenerateTokenPostRequest, UserPostRequest,
};
use crate::request::{Authorization, RequestBody, RequestSpec};
use crate::response::ApiResponse;
use crate::schema::{SchemaLocator, SchemaValidator};
use crate::services::endpoint_or;

pub const AUTHORIZED_PATH: &str = "Account/v1/Authorized";
pub const USER_PATH: &str = "Account/v1/User";
pub const GENERATE_TOKEN_PATH: &str = "Account/v1/GenerateToken";

pub fn authorized_success_schema() -> SchemaLocator {
    SchemaLocator::named("account/post/authorized", "authorized_post_success_200")
}

pub fn generate_token_success_schema() -> SchemaLocator {
    SchemaLocator::named("account/post/generatetoken", "generatetoken_post_success_200")
}

pub fn user_get_success_schema() -> SchemaLocator {
    SchemaLocator::named("account/get/user", "user_get_success_200")
}

/// Calls on the `Account/v1` resources.
#[derive(Debug, Clone)]
pub struct AccountService {
    executor: RequestExecutor,
    schemas: SchemaValidator,
    authorized_path: String,
    user_path: String,
    generate_token_path: String,
}

impl AccountService {
    pub fn new(executor: RequestExecutor, schemas: SchemaValidator) -> Self {
        Self {
            executor,
            schemas,
            authorized_path: AUTHORIZED_PATH.to_string(),
            user_path: USER_PATH.to_string(),
            generate_token_path: GENERATE_TOKEN_PATH.to_string(),
        }
    }

    /// Take resource paths from `endpoint.authorized`, `endpoint.user` and
    /// `endpoint.generate.token`, keeping the defaults for blank keys
    pub fn with_configuration(mut self, config: &Configuration) -> Self {
        self.authorized_path = endpoint_or(config, "authorized", AUTHORIZED_PATH);
        self.user_path = endpoint_or(config, "user", USER_PATH);
        self.generate_token_path = endpoint_or(config, "generate.token", GENERATE_TOKEN_PATH);
        self
    }

    pub async fn post_authorized(&self, request: &AuthorizedPostRequest) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::post(self.executor.url(&self.authorized_path))
            .body(RequestBody::from_model(request)?);
        self.executor.execute(spec).await
    }

    /// Whether the body matches the authorized success schema. A missing
    /// schema file is returned as an error.
    pub fn is_valid_with_schema(&self, response: &ApiResponse) -> ApiResult<bool> {
        let report = self
            .schemas
            .validate_response(&authorized_success_schema(), response)?;
        Ok(report.is_valid())
    }

    /// Whether the body deserializes to `{"success": true}`
    pub fn is_valid_with_model(&self, response: &ApiResponse) -> bool {
        match response.deserialize::<AuthorizedPostSuccessResponse>() {
            Ok(actual) if actual == AuthorizedPostSuccessResponse::new(true) => {
                info!("Authorized response matches the success model");
                true
            }
            Ok(actual) => {
                error!(success = actual.success, "Authorized response does not match the success model");
                false
            }
            Err(e) => {
                error!(error = %e, "Authorized response could not be read as the success model");
                false
            }
        }
    }

    pub async fn create_user(&self, request: &UserPostRequest) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::post(self.executor.url(&self.user_path))
            .body(RequestBody::from_model(request)?);
        self.executor.execute(spec).await
    }

    pub async fn get_user(&self, user_id: &str, authorization: &Authorization) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::get(self.executor.url(&format!("{}/{user_id}", self.user_path)))
            .authorization(authorization.clone());
        self.executor.execute(spec).await
    }

    pub async fn delete_user(&self, user_id: &str, authorization: &Authorization) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::delete(self.executor.url(&format!("{}/{user_id}", self.user_path)))
            .authorization(authorization.clone());
        self.executor.execute(spec).await
    }

    pub async fn generate_token(&self, request: &GenerateTokenPostRequest) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::post(self.executor.url(&self.generate_token_path))
            .body(RequestBody::from_model(request)?);
        self.executor.execute(spec).await
    }

    pub fn schemas(&self) -> &SchemaValidator {
        &self.schemas
    }
}
