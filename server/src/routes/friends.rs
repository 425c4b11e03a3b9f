//! Friend lists and friend requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use wire::model::{Friend, FriendRequestBody};

use crate::state::{AppState, Change};
use crate::store::StoreError;

/// `GET /api/friends/{uid}`
pub async fn list_friends(State(state): State<AppState>, Path(uid): Path<String>) -> Result<Json<Vec<Friend>>, StoreError> {
    Ok(Json(state.store.read().await.friends(&uid)?))
}

/// `GET /api/friends/requests/{uid}`
pub async fn list_requests(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<Friend>>, StoreError> {
    Ok(Json(state.store.read().await.friend_requests(&uid)?))
}

/// `POST /api/friends/request`
pub async fn send_request(
    State(state): State<AppState>,
    Json(body): Json<FriendRequestBody>,
) -> Result<StatusCode, StoreError> {
    state
        .store
        .write()
        .await
        .send_friend_request(&body.from_uid, &body.to_uid)?;
    state.publish(&[Change::Users]).await;
    Ok(StatusCode::CREATED)
}

/// `POST /api/friends/accept`
pub async fn accept_request(
    State(state): State<AppState>,
    Json(body): Json<FriendRequestBody>,
) -> Result<StatusCode, StoreError> {
    state
        .store
        .write()
        .await
        .accept_friend_request(&body.from_uid, &body.to_uid, chrono::Utc::now())?;
    state.publish(&[Change::Users]).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/friends/request`
pub async fn reject_request(
    State(state): State<AppState>,
    Json(body): Json<FriendRequestBody>,
) -> Result<StatusCode, StoreError> {
    state
        .store
        .write()
        .await
        .reject_friend_request(&body.from_uid, &body.to_uid)?;
    state.publish(&[Change::Users]).await;
    Ok(StatusCode::NO_CONTENT)
}
