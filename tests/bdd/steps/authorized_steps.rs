use apirest_client::models::AuthorizedPostRequest;
use cucumber::{given, then, when};

use super::world::ApiWorld;

#[given("the configured test user")]
async fn configured_test_user(world: &mut ApiWorld) {
    let configuration = world.configuration();
    world.authorized_request =
        AuthorizedPostRequest::new(configuration.test_username(), configuration.test_password());
}

#[given(expr = "the user name {string}")]
async fn user_name(world: &mut ApiWorld, name: String) {
    world.authorized_request.user_name = Some(name);
}

#[given(expr = "the password {string}")]
async fn password(world: &mut ApiWorld, secret: String) {
    world.authorized_request.password = Some(secret);
}

#[when("I post the credentials to the authorized endpoint")]
async fn post_authorized(world: &mut ApiWorld) {
    let result = world.account().post_authorized(&world.authorized_request).await;
    world.record(result);
}

#[then("the response matches the authorized success schema")]
async fn matches_schema(world: &mut ApiWorld) {
    let valid = world
        .account()
        .is_valid_with_schema(world.response())
        .unwrap_or_else(|e| panic!("schema check failed: {e}"));
    assert!(valid, "body does not match the schema: {}", world.response().body_one_line());
}

#[then("the response matches the authorized success model")]
async fn matches_model(world: &mut ApiWorld) {
    assert!(
        world.account().is_valid_with_model(world.response()),
        "body does not match the model: {}",
        world.response().body_one_line()
    );
}

#[then("the response does not match the authorized success model")]
async fn does_not_match_model(world: &mut ApiWorld) {
    assert!(!world.account().is_valid_with_model(world.response()));
}
