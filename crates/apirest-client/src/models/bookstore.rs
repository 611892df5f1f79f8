//! Bookstore API payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Isbn {
    pub isbn: String,
}

impl Isbn {
    pub fn new(isbn: impl Into<String>) -> Self {
        Self { isbn: isbn.into() }
    }
}

/// Body of `POST BookStore/v1/Books`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksPostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub collection_of_isbns: Vec<Isbn>,
}

impl BooksPostRequest {
    pub fn new<I, S>(user_id: impl Into<String>, isbns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: Some(user_id.into()),
            collection_of_isbns: isbns.into_iter().map(Isbn::new).collect(),
        }
    }
}

/// Body of `PUT BookStore/v1/Books/{isbn}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksPutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl BooksPutRequest {
    pub fn new(user_id: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            isbn: Some(isbn.into()),
        }
    }
}
