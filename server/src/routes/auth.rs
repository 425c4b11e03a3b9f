//! Email/password accounts.
//!
//! DESIGN
//! ======
//! Login exchanges credentials for the user id the browser keeps in
//! `localStorage`. There are no sessions or tokens: this service backs local
//! development and the e2e flows only.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::{info, warn};
use wire::model::{LoginRequest, LoginResponse, RegisterRequest};

use crate::state::{AppState, Change};
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// `POST /api/auth/login`
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Result<Json<LoginResponse>, StoreError> {
    match state.store.read().await.login(&body.email, &body.password) {
        Ok(resp) => {
            info!(uid = %resp.local_id, "auth: login");
            Ok(Json(resp))
        }
        Err(e) => {
            warn!(error = %e, "auth: login rejected");
            Err(e)
        }
    }
}

/// `POST /api/auth/createUser`: the account stays unverified until
/// `verifyUser`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), StoreError> {
    let uid = state.store.write().await.create_user(&body)?;
    state.publish(&[Change::Users]).await;
    let email = body.email.trim().to_lowercase();
    Ok((StatusCode::CREATED, Json(LoginResponse { local_id: uid, email })))
}

/// `POST /api/auth/verifyUser?email=`
pub async fn verify_user(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> Result<StatusCode, StoreError> {
    state.store.write().await.verify_user(&query.email)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/auth/logout?email=`: marks the user offline.
pub async fn logout(State(state): State<AppState>, Query(query): Query<EmailQuery>) -> Result<StatusCode, StoreError> {
    state.store.write().await.logout(&query.email)?;
    state.publish(&[Change::Users]).await;
    Ok(StatusCode::NO_CONTENT)
}
