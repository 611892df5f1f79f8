use apirest_client::{ApiError, TokenRequest};
use apirest_test_utils::server::USER_ID;
use cucumber::{then, when};

use super::world::ApiWorld;

#[when("I request an access token")]
async fn request_token(world: &mut ApiWorld) {
    request_with(world, TokenRequest::new()).await;
}

#[when(expr = "I request an access token as {string} with password {string}")]
async fn request_token_as(world: &mut ApiWorld, username: String, password: String) {
    request_with(world, TokenRequest::new().credentials(username, password)).await;
}

async fn request_with(world: &mut ApiWorld, request: TokenRequest) {
    match world.authentication().generate_token(&request).await {
        Ok(grant) => {
            world.response = Some(grant.response().clone());
            world.error = None;
            world.grant = Some(grant);
        }
        Err(e) => {
            world.grant = None;
            world.record(Err(e));
        }
    }
}

#[then("the token response has an access token")]
async fn has_access_token(world: &mut ApiWorld) {
    let token = world.grant().access_token().unwrap_or_default();
    assert!(!token.trim().is_empty(), "no access token in {:?}", world.grant().token());
}

#[then("the authorization value combines the token type and the access token")]
async fn authorization_combines(world: &mut ApiWorld) {
    let grant = world.grant();
    let configured_type = world.configuration().auth_type();
    let kind = if configured_type.trim().is_empty() {
        grant.token_type().unwrap_or_default().to_string()
    } else {
        configured_type
    };
    let expected = format!("{kind} {}", grant.access_token().unwrap_or_default());

    assert_eq!(grant.authorization_value().ok(), Some(expected));
}

#[then(expr = "the token request is rejected with status {int}")]
async fn token_rejected(world: &mut ApiWorld, status: u16) {
    match &world.error {
        Some(ApiError::UnexpectedStatus { status: actual, .. }) => assert_eq!(*actual, status),
        Some(other) => panic!("unexpected error: {other}"),
        None => panic!("token request succeeded"),
    }
}

#[then(expr = "the access token opens the user account with status {int}")]
async fn token_opens_account(world: &mut ApiWorld, status: u16) {
    let authorization = world
        .grant()
        .authorization()
        .unwrap_or_else(|e| panic!("no authorization: {e}"));
    let result = world.account().get_user(USER_ID, &authorization).await;
    world.record(result);

    assert_eq!(world.response().status_code(), status);
}
