use apirest_config::Configuration;

use crate::error::ApiResult;
use crate::executor::RequestExecutor;
use crate::models::{BooksPostRequest, BooksPutRequest};
use crate::request::{Authorization, RequestBody, RequestSpec};
use crate::response::ApiResponse;
use crate::services::endpoint_or;

pub const BOOKS_PATH: &str = "BookStore/v1/Books";
pub const BOOK_PATH: &str = "BookStore/v1/Book";

/// Calls on the `BookStore/v1` resources.
#[derive(Debug, Clone)]
pub struct BookstoreService {
    executor: RequestExecutor,
    books_path: String,
    book_path: String,
}

impl BookstoreService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self {
            executor,
            books_path: BOOKS_PATH.to_string(),
            book_path: BOOK_PATH.to_string(),
        }
    }

    /// Take resource paths from `endpoint.books` and `endpoint.book`,
    /// keeping the defaults for blank keys
    pub fn with_configuration(mut self, config: &Configuration) -> Self {
        self.books_path = endpoint_or(config, "books", BOOKS_PATH);
        self.book_path = endpoint_or(config, "book", BOOK_PATH);
        self
    }

    pub async fn list_books(&self) -> ApiResult<ApiResponse> {
        self.executor
            .execute(RequestSpec::get(self.executor.url(&self.books_path)))
            .await
    }

    pub async fn get_book(&self, isbn: &str) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::get(self.executor.url(&self.book_path)).query_param("ISBN", isbn);
        self.executor.execute(spec).await
    }

    pub async fn add_books(
        &self,
        request: &BooksPostRequest,
        authorization: &Authorization,
    ) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::post(self.executor.url(&self.books_path))
            .body(RequestBody::from_model(request)?)
            .authorization(authorization.clone());
        self.executor.execute(spec).await
    }

    /// Swap the book `isbn` in the user's collection for `request.isbn`
    pub async fn replace_book(
        &self,
        isbn: &str,
        request: &BooksPutRequest,
        authorization: &Authorization,
    ) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::put(self.executor.url(&format!("{}/{isbn}", self.books_path)))
            .body(RequestBody::from_model(request)?)
            .authorization(authorization.clone());
        self.executor.execute(spec).await
    }

    /// Remove every book from the user's collection
    pub async fn delete_books(&self, user_id: &str, authorization: &Authorization) -> ApiResult<ApiResponse> {
        let spec = RequestSpec::delete(self.executor.url(&self.books_path))
            .query_param("UserId", user_id)
            .authorization(authorization.clone());
        self.executor.execute(spec).await
    }
}
