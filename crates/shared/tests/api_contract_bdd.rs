//! Behavioural tests for the shared API contract.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use schemas::Schema;
use serde_json::{Value, json};
use shared::{ApiEndpoints, ApiError, CreatePostRequest};

#[derive(Default, ScenarioState)]
struct World {
    payload: Slot<Value>,
    error: Slot<ApiError>,
    user_id: Slot<String>,
}

impl World {
    fn error(&self) -> ApiError {
        self.error.get().expect("error should be set")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

fn unquote(raw: &str) -> &str {
    raw.trim_matches('"')
}

#[given("a create-post payload without a title")]
fn a_create_post_payload_without_a_title(world: &World) {
    world.payload.set(json!({
        "authorId": "123e4567-e89b-12d3-a456-426614174000",
        "content": "body",
    }));
}

#[given("an internal error with message {message}")]
fn an_internal_error_with_message(world: &World, message: String) {
    world.error.set(ApiError::internal(unquote(&message)));
}

#[given("the user id {id}")]
fn the_user_id(world: &World, id: String) {
    world.user_id.set(unquote(&id).to_owned());
}

#[when("the payload is validated and converted into an API error")]
fn the_payload_is_converted(world: &World) {
    let payload = world.payload.get().expect("payload should be set");
    let failure = CreatePostRequest::validate(&payload).expect_err("payload should be rejected");
    world.error.set(ApiError::from_validation(&failure));
}

#[when("the error is redacted for clients")]
fn the_error_is_redacted(world: &World) {
    world.error.set(world.error().redacted());
}

#[then("the envelope has status code {status:u16}")]
fn the_envelope_has_status_code(world: &World, status: u16) {
    assert_eq!(world.error().status_code(), status);
}

#[then("the envelope is labelled {label}")]
fn the_envelope_is_labelled(world: &World, label: String) {
    assert_eq!(world.error().error(), Some(unquote(&label)));
}

#[then("the envelope message mentions {fragment}")]
fn the_envelope_message_mentions(world: &World, fragment: String) {
    let error = world.error();
    assert!(
        error.message().contains(unquote(&fragment)),
        "message was {}",
        error.message()
    );
}

#[then("the envelope message is {message}")]
fn the_envelope_message_is(world: &World, message: String) {
    assert_eq!(world.error().message(), unquote(&message));
}

#[then("the user posts path is {path}")]
fn the_user_posts_path_is(world: &World, path: String) {
    let id = world.user_id.get().expect("user id should be set");
    assert_eq!(ApiEndpoints::user_posts(id), unquote(&path));
}

#[scenario(
    path = "tests/features/api_contract.feature",
    name = "A rejected payload becomes a bad-request envelope"
)]
fn a_rejected_payload_becomes_a_bad_request_envelope(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/api_contract.feature",
    name = "Server failures do not leak details"
)]
fn server_failures_do_not_leak_details(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/api_contract.feature",
    name = "Paths of a user's posts"
)]
fn paths_of_a_users_posts(world: World) {
    let _ = world;
}
