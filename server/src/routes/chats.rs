//! Chat records and individual-chat creation.

use axum::extract::{Path, State};
use axum::response::Json;
use wire::model::{Chat, CreateChatOutcome, CreateIndividualChatRequest};

use crate::state::{AppState, Change};
use crate::store::StoreError;

/// `GET /api/chats/{id}`
pub async fn get_chat(State(state): State<AppState>, Path(chat_id): Path<String>) -> Result<Json<Chat>, StoreError> {
    let store = state.store.read().await;
    Ok(Json(store.chat(&chat_id)?.clone()))
}

/// `POST /api/chats/individual`: reports an existing chat or creates one.
pub async fn create_individual(
    State(state): State<AppState>,
    Json(body): Json<CreateIndividualChatRequest>,
) -> Result<Json<CreateChatOutcome>, StoreError> {
    let outcome = state.store.write().await.create_individual_chat_if_absent(
        &body.current_user_id,
        &body.friend_id,
        &body.message,
        chrono::Utc::now(),
    )?;
    if !outcome.already_exists {
        state
            .publish(&[Change::Users, Change::Chat(outcome.chat_id.clone())])
            .await;
    }
    Ok(Json(outcome))
}
