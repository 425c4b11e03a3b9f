//! User records, presence, and read state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use tracing::info;
use wire::model::{StatusUpdate, User};

use crate::state::{AppState, Change};
use crate::store::StoreError;

/// `GET /api/users/{id}`
pub async fn get_user(State(state): State<AppState>, Path(user_id): Path<String>) -> Result<Json<User>, StoreError> {
    let store = state.store.read().await;
    Ok(Json(store.user(&user_id)?.clone()))
}

/// `PUT /api/users/{id}/status`
pub async fn set_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<StatusCode, StoreError> {
    state.store.write().await.set_status(&user_id, &body.status)?;
    info!(%user_id, status = %body.status, "users: status updated");
    state.publish(&[Change::Users]).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/users/markChatAsRead/{chat_id}`: idempotent; publishes only
/// when something was unread.
pub async fn mark_chat_read(State(state): State<AppState>, Path(chat_id): Path<String>) -> Result<StatusCode, StoreError> {
    let changed = state.store.write().await.mark_chat_read(&chat_id)?;
    if changed {
        info!(%chat_id, "users: chat marked read");
        state.publish(&[Change::Users, Change::Chat(chat_id)]).await;
    }
    Ok(StatusCode::NO_CONTENT)
}
