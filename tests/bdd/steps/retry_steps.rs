use apirest_client::ApiError;
use cucumber::{given, then};
use serde_json::json;

use super::world::ApiWorld;

#[given(expr = "the endpoint {string} fails {int} times with status {int}")]
async fn endpoint_fails_times(world: &mut ApiWorld, path: String, times: u64, status: u16) {
    world
        .api()
        .mount_flaky("GET", &path, status, times, json!({"recovered": true}))
        .await;
}

#[given(expr = "the endpoint {string} always fails with status {int}")]
async fn endpoint_always_fails(world: &mut ApiWorld, path: String, status: u16) {
    world.api().mount_status("GET", &path, status).await;
}

#[given("error statuses are retried")]
async fn retry_error_statuses(world: &mut ApiWorld) {
    world.retry_on_error_status = true;
}

#[then(expr = "the endpoint {string} should have received {int} requests")]
async fn received_requests(world: &mut ApiWorld, path: String, count: usize) {
    assert_eq!(world.api().request_count(&path).await, count);
}

#[then(expr = "the request should fail after {int} attempts")]
async fn failed_after(world: &mut ApiWorld, attempts: u32) {
    match &world.error {
        Some(error @ ApiError::RetriesExhausted { .. }) => {
            assert_eq!(error.attempts(), Some(attempts), "{error}");
        }
        Some(other) => panic!("unexpected error: {other}"),
        None => panic!("request succeeded"),
    }
}
