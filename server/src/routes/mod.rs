//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the REST façade and the websocket channel under `/api`
//! and, when a Leptos configuration is available, stitches in SSR rendering
//! of the browser client with its `/pkg` assets.

pub mod auth;
pub mod chats;
pub mod friends;
pub mod messages;
pub mod users;
pub mod ws;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::store::StoreError;

/// HTTP status for a store failure.
pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Unauthorized => StatusCode::UNAUTHORIZED,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        (store_error_to_status(&self), self.to_string()).into_response()
    }
}

/// REST + websocket routes.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/createUser", post(auth::create_user))
        .route("/api/auth/verifyUser", post(auth::verify_user))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/users/markChatAsRead/{chat_id}", put(users::mark_chat_read))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/users/{id}/status", put(users::set_status))
        .route("/api/chats/individual", post(chats::create_individual))
        .route("/api/chats/{id}", get(chats::get_chat))
        .route("/api/messages/{chat_id}", get(messages::list_messages))
        .route("/api/messages/{chat_id}/send", post(messages::send_message))
        .route(
            "/api/messages/{chat_id}/{message_id}",
            put(messages::update_message).delete(messages::delete_message),
        )
        .route("/api/friends/request", post(friends::send_request).delete(friends::reject_request))
        .route("/api/friends/accept", post(friends::accept_request))
        .route("/api/friends/requests/{uid}", get(friends::list_requests))
        .route("/api/friends/{uid}", get(friends::list_friends))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// API routes plus Leptos SSR of the browser client.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing
/// `[workspace.metadata.leptos]` and no `LEPTOS_*` environment).
pub fn leptos_app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg"))))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
