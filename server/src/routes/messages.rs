//! Message listing and mutation.
//!
//! Every mutation publishes the chat's full message list and the user
//! snapshot, since summaries follow the newest message.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use wire::model::{Message, SendMessageRequest, UpdateMessageRequest};

use crate::state::{AppState, Change};
use crate::store::StoreError;

/// `GET /api/messages/{chat_id}`: ordered oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>, StoreError> {
    Ok(Json(state.store.read().await.messages(&chat_id)?))
}

/// `POST /api/messages/{chat_id}/send`
pub async fn send_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<Message>, StoreError> {
    let message = state
        .store
        .write()
        .await
        .send_message(&chat_id, &body.sender, &body.content, chrono::Utc::now())?;
    state.publish(&[Change::Chat(chat_id), Change::Users]).await;
    Ok(Json(message))
}

/// `PUT /api/messages/{chat_id}/{message_id}`
pub async fn update_message(
    State(state): State<AppState>,
    Path((chat_id, message_id)): Path<(String, String)>,
    Json(body): Json<UpdateMessageRequest>,
) -> Result<StatusCode, StoreError> {
    state
        .store
        .write()
        .await
        .update_message(&chat_id, &message_id, &body.content)?;
    state.publish(&[Change::Chat(chat_id), Change::Users]).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/messages/{chat_id}/{message_id}`
pub async fn delete_message(
    State(state): State<AppState>,
    Path((chat_id, message_id)): Path<(String, String)>,
) -> Result<StatusCode, StoreError> {
    state.store.write().await.delete_message(&chat_id, &message_id)?;
    state.publish(&[Change::Chat(chat_id), Change::Users]).await;
    Ok(StatusCode::NO_CONTENT)
}
