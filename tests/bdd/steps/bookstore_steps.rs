use apirest_bdd_tests::utils::parse_table;
use apirest_client::models::{BooksPostRequest, BooksPutRequest};
use apirest_client::Authorization;
use apirest_test_utils::server::{ACCESS_TOKEN, TOKEN_TYPE, USER_ID};
use cucumber::gherkin::Step;
use cucumber::{then, when};
use serde_json::Value;

use super::world::ApiWorld;

fn mock_authorization() -> Authorization {
    Authorization::typed(TOKEN_TYPE, ACCESS_TOKEN)
}

#[when("I list the books")]
async fn list_books(world: &mut ApiWorld) {
    let result = world.bookstore().list_books().await;
    world.record(result);
}

#[when(expr = "I look up the book {string}")]
async fn get_book(world: &mut ApiWorld, isbn: String) {
    let result = world.bookstore().get_book(&isbn).await;
    world.record(result);
}

#[when(expr = "I add the book {string} to the user collection")]
async fn add_book(world: &mut ApiWorld, isbn: String) {
    let request = BooksPostRequest::new(USER_ID, [isbn]);
    let result = world.bookstore().add_books(&request, &mock_authorization()).await;
    world.record(result);
}

#[when(expr = "I replace the book {string} with {string}")]
async fn replace_book(world: &mut ApiWorld, isbn: String, replacement: String) {
    let request = BooksPutRequest::new(USER_ID, replacement);
    let result = world
        .bookstore()
        .replace_book(&isbn, &request, &mock_authorization())
        .await;
    world.record(result);
}

#[when("I clear the user collection")]
async fn clear_collection(world: &mut ApiWorld) {
    let result = world
        .bookstore()
        .delete_books(USER_ID, &mock_authorization())
        .await;
    world.record(result);
}

#[then("the catalog contains:")]
async fn catalog_contains(world: &mut ApiWorld, step: &Step) {
    let table = step.table.as_ref().expect("catalog table");
    let books = world
        .response()
        .list_for_path("books")
        .unwrap_or_else(|e| panic!("{e}"));

    for row in parse_table(table) {
        let found = books.iter().any(|book| {
            row.iter()
                .all(|(field, value)| book.get(field).and_then(Value::as_str) == Some(value.as_str()))
        });
        assert!(found, "no book matches {row:?}");
    }
}
