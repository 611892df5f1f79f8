use std::time::Duration;

use apirest_bdd_tests::utils::parse_pairs;
use apirest_client::{Method, RequestSpec, SchemaLocator};
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use serde_json::Value;

use super::world::ApiWorld;

#[given("the request headers:")]
async fn request_headers(world: &mut ApiWorld, step: &Step) {
    if let Some(table) = step.table.as_ref() {
        world.headers.extend(parse_pairs(table));
    }
}

#[given("the query parameters:")]
async fn query_parameters(world: &mut ApiWorld, step: &Step) {
    if let Some(table) = step.table.as_ref() {
        world.query.extend(parse_pairs(table));
    }
}

#[when(expr = "I send a {word} request to {string}")]
async fn send_request(world: &mut ApiWorld, verb: String, path: String) {
    send(world, &verb, &path, None).await;
}

#[when(expr = "I send a {word} request to {string} with body:")]
async fn send_request_with_body(world: &mut ApiWorld, verb: String, path: String, step: &Step) {
    let body = step.docstring.clone().unwrap_or_default();
    send(world, &verb, &path, Some(body)).await;
}

async fn send(world: &mut ApiWorld, verb: &str, path: &str, body: Option<String>) {
    let method: Method = verb.parse().unwrap_or_else(|e| panic!("{e}"));
    let executor = world.executor();

    let mut spec = RequestSpec::new(method, executor.url(path))
        .headers(world.headers.drain(..))
        .query_params(world.query.drain(..));
    if let Some(body) = body {
        spec = spec.raw_body(body.trim());
    }

    let result = executor.execute(spec).await;
    world.record(result);
}

#[then(expr = "the response status should be {int}")]
async fn response_status(world: &mut ApiWorld, status: u16) {
    let response = world.response();
    assert_eq!(
        response.status_code(),
        status,
        "unexpected status, body: {}",
        response.body_one_line()
    );
}

#[then(expr = "the field {string} should be {string}")]
async fn field_equals(world: &mut ApiWorld, path: String, expected: String) {
    let actual = world
        .response()
        .value_at(&path)
        .unwrap_or_else(|e| panic!("{e}"));
    let actual = match actual {
        Value::String(text) => text,
        other => other.to_string(),
    };
    assert_eq!(actual, expected, "field {path}");
}

#[then(expr = "the list {string} should have {int} items")]
async fn list_size(world: &mut ApiWorld, path: String, size: usize) {
    let items = world
        .response()
        .list_for_path(&path)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(items.len(), size, "items at {path}: {items:?}");
}

#[then("the response body should be valid JSON")]
async fn valid_json(world: &mut ApiWorld) {
    if let Err(e) = world.response().validate_json_structure() {
        panic!("{e}");
    }
}

#[then(expr = "the response body should contain {string}")]
async fn body_contains(world: &mut ApiWorld, text: String) {
    assert!(
        world.response().body_contains(&text),
        "body does not contain {text:?}: {}",
        world.response().body_one_line()
    );
}

#[then(expr = "the response header {string} should be {string}")]
async fn header_equals(world: &mut ApiWorld, name: String, expected: String) {
    assert_eq!(world.response().header(&name), Some(expected.as_str()));
}

#[then(expr = "the response should match the schema {string} in {string}")]
async fn matches_named_schema(world: &mut ApiWorld, name: String, dir: String) {
    let report = world
        .schemas
        .validate_response(&SchemaLocator::named(dir, name), world.response())
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(report.is_valid(), "schema errors: {:?}", report.errors);
}

#[then(expr = "the response should arrive within {int} milliseconds")]
async fn response_time(world: &mut ApiWorld, millis: u64) {
    let response = world.response();
    assert!(
        response.within_response_time(Duration::from_millis(millis)),
        "response took {:?}",
        response.elapsed()
    );
}
