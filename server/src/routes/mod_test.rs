use super::*;
use axum::extract::{Path, State};
use axum::response::Json;
use tokio::time::{Duration, timeout};
use wire::model::{CreateIndividualChatRequest, FriendRequestBody, SendMessageRequest, UpdateMessageRequest};

use crate::state::test_helpers;

#[test]
fn store_errors_map_to_statuses() {
    assert_eq!(store_error_to_status(&StoreError::NotFound("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(store_error_to_status(&StoreError::Unauthorized), StatusCode::UNAUTHORIZED);
    assert_eq!(store_error_to_status(&StoreError::Conflict("x".into())), StatusCode::CONFLICT);
    assert_eq!(store_error_to_status(&StoreError::Invalid("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(StoreError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_user_and_missing_user() {
    let state = test_helpers::test_app_state();
    let Json(user) = users::get_user(State(state.clone()), Path("u-luigi".to_owned()))
        .await
        .expect("user");
    assert_eq!(user.username, "Luigi Bianchi");

    let err = users::get_user(State(state), Path("ghost".to_owned()))
        .await
        .expect_err("missing");
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn send_publishes_chat_then_users() {
    let state = test_helpers::test_app_state();
    let mut rx = state.hub.subscribe();

    let Json(message) = messages::send_message(
        State(state.clone()),
        Path("c-marco-luigi".to_owned()),
        Json(SendMessageRequest { content: "Ciao".to_owned(), sender: "u-marco".to_owned() }),
    )
    .await
    .expect("send");
    assert_eq!(message.content, "Ciao");

    let first = timeout(Duration::from_millis(500), rx.recv()).await.expect("timely").expect("frame");
    let second = timeout(Duration::from_millis(500), rx.recv()).await.expect("timely").expect("frame");
    assert_eq!(first.syscall, "chats:messages");
    assert_eq!(second.syscall, "users:snapshot");
}

#[tokio::test]
async fn mark_read_publishes_only_on_change() {
    let state = test_helpers::test_app_state();
    let mut rx = state.hub.subscribe();

    let status = users::mark_chat_read(State(state.clone()), Path("c-marco-luigi".to_owned()))
        .await
        .expect("mark");
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(rx.try_recv().is_ok(), "first mark publishes");
    while rx.try_recv().is_ok() {}

    users::mark_chat_read(State(state.clone()), Path("c-marco-luigi".to_owned()))
        .await
        .expect("second mark");
    assert!(rx.try_recv().is_err(), "repeat mark stays quiet");
}

#[tokio::test]
async fn edit_and_delete_round_through_handlers() {
    let state = test_helpers::test_app_state();
    messages::update_message(
        State(state.clone()),
        Path(("c-marco-luigi".to_owned(), "m-001".to_owned())),
        Json(UpdateMessageRequest { content: "Still on for Sunday?".to_owned() }),
    )
    .await
    .expect("update");
    messages::delete_message(State(state.clone()), Path(("c-marco-luigi".to_owned(), "m-002".to_owned())))
        .await
        .expect("delete");

    let Json(listed) = messages::list_messages(State(state), Path("c-marco-luigi".to_owned()))
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "Still on for Sunday?");
}

#[tokio::test]
async fn create_individual_reports_existing_chat() {
    let state = test_helpers::test_app_state();
    let Json(outcome) = chats::create_individual(
        State(state),
        Json(CreateIndividualChatRequest {
            current_user_id: "u-marco".to_owned(),
            friend_id: "u-luigi".to_owned(),
            message: "hi".to_owned(),
        }),
    )
    .await
    .expect("create");
    assert!(outcome.already_exists);
    assert_eq!(outcome.chat_id, "c-marco-luigi");
}

#[tokio::test]
async fn friend_request_accept_flow() {
    let state = test_helpers::test_app_state();
    let body = || FriendRequestBody { from_uid: "u-giulia".to_owned(), to_uid: "u-luigi".to_owned() };

    let Json(requests) = friends::list_requests(State(state.clone()), Path("u-luigi".to_owned()))
        .await
        .expect("requests");
    assert_eq!(requests.len(), 1);

    friends::accept_request(State(state.clone()), Json(body())).await.expect("accept");
    let err = friends::reject_request(State(state.clone()), Json(body()))
        .await
        .expect_err("already handled");
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let Json(friends) = friends::list_friends(State(state), Path("u-luigi".to_owned()))
        .await
        .expect("friends");
    assert!(friends.iter().any(|f| f.id == "u-giulia"));
}
