//! Request and response bodies of the APIs under test.

pub mod account;
pub mod bookstore;

pub use account::{
    AuthorizedPostRequest, AuthorizedPostSuccessResponse, Book, GenerateTokenPostErrorResponse,
    GenerateTokenPostRequest, GenerateTokenPostSuccessResponse, UserGetSuccessResponse,
    UserPostRequest, UserPostSuccessResponse,
};
pub use bookstore::{BooksPostRequest, BooksPutRequest, Isbn};
