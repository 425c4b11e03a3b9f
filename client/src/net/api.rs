//! Data access façade over the chat backend's REST API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning [`ApiError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Views branch on
//! [`ApiError::kind`]: `Auth` blocks the view with a retry affordance,
//! `NotFound` is terminal for the view, `Transient` renders inline and lets
//! the user retry. Nothing here retries on its own.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use wire::model::{Chat, CreateChatOutcome, Friend, LoginResponse, Message, User};

/// Failure of a backend call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No persisted session to act as.
    #[error("not signed in")]
    Unauthenticated,
    /// The backend rejected the session (401/403).
    #[error("session rejected ({0})")]
    Unauthorized(u16),
    #[error("{0} not found")]
    NotFound(String),
    /// Any other non-success status.
    #[error("request failed with status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not available during server rendering")]
    Unavailable,
}

/// How a view should react to an [`ApiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    NotFound,
    Transient,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated | Self::Unauthorized(_) => ErrorKind::Auth,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Status(_) | Self::Network(_) | Self::Decode(_) | Self::Unavailable => {
                ErrorKind::Transient
            }
        }
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn classify_status(status: u16, what: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized(status),
        404 => ApiError::NotFound(what.to_owned()),
        _ => ApiError::Status(status),
    }
}

// =============================================================================
// ENDPOINTS
// =============================================================================

#[cfg(any(test, feature = "hydrate"))]
fn user_endpoint(user_id: &str) -> String {
    format!("/api/users/{user_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn user_status_endpoint(user_id: &str) -> String {
    format!("/api/users/{user_id}/status")
}

#[cfg(any(test, feature = "hydrate"))]
fn mark_read_endpoint(chat_id: &str) -> String {
    format!("/api/users/markChatAsRead/{chat_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn chat_endpoint(chat_id: &str) -> String {
    format!("/api/chats/{chat_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn messages_endpoint(chat_id: &str) -> String {
    format!("/api/messages/{chat_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn send_message_endpoint(chat_id: &str) -> String {
    format!("/api/messages/{chat_id}/send")
}

#[cfg(any(test, feature = "hydrate"))]
fn message_endpoint(chat_id: &str, message_id: &str) -> String {
    format!("/api/messages/{chat_id}/{message_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn friends_endpoint(user_id: &str) -> String {
    format!("/api/friends/{user_id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn friend_requests_endpoint(user_id: &str) -> String {
    format!("/api/friends/requests/{user_id}")
}

#[cfg(feature = "hydrate")]
const INDIVIDUAL_CHAT_ENDPOINT: &str = "/api/chats/individual";
#[cfg(feature = "hydrate")]
const FRIEND_REQUEST_ENDPOINT: &str = "/api/friends/request";
#[cfg(feature = "hydrate")]
const FRIEND_ACCEPT_ENDPOINT: &str = "/api/friends/accept";

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::{Request, Response};
    use serde::de::DeserializeOwned;

    use super::{ApiError, classify_status};

    fn network(err: gloo_net::Error) -> ApiError {
        ApiError::Network(err.to_string())
    }

    pub(super) async fn call(request: Result<Request, gloo_net::Error>) -> Result<Response, ApiError> {
        request.map_err(network)?.send().await.map_err(network)
    }

    pub(super) fn ensure_ok(resp: &Response, what: &str) -> Result<(), ApiError> {
        if resp.ok() {
            Ok(())
        } else {
            Err(classify_status(resp.status(), what))
        }
    }

    pub(super) async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T, ApiError> {
        ensure_ok(&resp, what)?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(super) async fn get_json<T: DeserializeOwned>(url: &str, what: &str) -> Result<T, ApiError> {
        let resp = call(Request::get(url).build()).await?;
        decode(resp, what).await
    }
}

// =============================================================================
// USERS
// =============================================================================

/// Fetch the record of the persisted session's user.
///
/// # Errors
///
/// [`ApiError::Unauthenticated`] when no session is persisted, otherwise as
/// [`fetch_user`].
pub async fn fetch_current_user() -> Result<User, ApiError> {
    let user_id = crate::util::session::current_user_id().ok_or(ApiError::Unauthenticated)?;
    fetch_user(&user_id).await
}

/// Fetch any user by id.
///
/// # Errors
///
/// `NotFound` for unknown ids; `Network`/`Status`/`Decode` otherwise.
pub async fn fetch_user(user_id: &str) -> Result<User, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&user_endpoint(user_id), "user").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user_id;
        Err(ApiError::Unavailable)
    }
}

/// Set presence (`"online"` / `"offline"`).
///
/// # Errors
///
/// Propagates transport and status failures.
pub async fn set_status(user_id: &str, status: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = wire::model::StatusUpdate { status: status.to_owned() };
        let resp = http::call(gloo_net::http::Request::put(&user_status_endpoint(user_id)).json(&body)).await?;
        http::ensure_ok(&resp, "user")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (user_id, status);
        Err(ApiError::Unavailable)
    }
}

/// Mark every message of a chat read for all participants. Idempotent on the
/// backend; callers treat failures as best-effort.
///
/// # Errors
///
/// Propagates transport and status failures.
pub async fn mark_chat_read(chat_id: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = http::call(gloo_net::http::Request::put(&mark_read_endpoint(chat_id)).build()).await?;
        http::ensure_ok(&resp, "chat")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = chat_id;
        Err(ApiError::Unavailable)
    }
}

// =============================================================================
// CHATS + MESSAGES
// =============================================================================

/// # Errors
///
/// `NotFound` for unknown chats.
pub async fn fetch_chat(chat_id: &str) -> Result<Chat, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&chat_endpoint(chat_id), "chat").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = chat_id;
        Err(ApiError::Unavailable)
    }
}

/// Fetch a chat's messages, ordered ascending by timestamp.
///
/// # Errors
///
/// `NotFound` for unknown chats.
pub async fn fetch_messages(chat_id: &str) -> Result<Vec<Message>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let mut messages: Vec<Message> = http::get_json(&messages_endpoint(chat_id), "chat").await?;
        crate::state::messages::sort_by_time(&mut messages);
        Ok(messages)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = chat_id;
        Err(ApiError::Unavailable)
    }
}

/// Send a message. The authoritative copy also arrives on the realtime channel.
///
/// # Errors
///
/// `NotFound` for unknown chats; transport failures otherwise.
pub async fn send_message(chat_id: &str, sender: &str, content: &str) -> Result<Message, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = wire::model::SendMessageRequest {
            content: content.to_owned(),
            sender: sender.to_owned(),
        };
        let resp = http::call(gloo_net::http::Request::post(&send_message_endpoint(chat_id)).json(&body)).await?;
        http::decode(resp, "chat").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (chat_id, sender, content);
        Err(ApiError::Unavailable)
    }
}

/// Replace a message's content.
///
/// # Errors
///
/// `NotFound` when the chat or message is gone.
pub async fn update_message(chat_id: &str, message_id: &str, content: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = wire::model::UpdateMessageRequest { content: content.to_owned() };
        let resp =
            http::call(gloo_net::http::Request::put(&message_endpoint(chat_id, message_id)).json(&body)).await?;
        http::ensure_ok(&resp, "message")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (chat_id, message_id, content);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// `NotFound` when the chat or message is gone.
pub async fn delete_message(chat_id: &str, message_id: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp =
            http::call(gloo_net::http::Request::delete(&message_endpoint(chat_id, message_id)).build()).await?;
        http::ensure_ok(&resp, "message")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (chat_id, message_id);
        Err(ApiError::Unavailable)
    }
}

/// Open the individual chat between the two users, creating it with
/// `message` as its first message when none exists.
///
/// # Errors
///
/// `NotFound` when either user is unknown.
pub async fn create_individual_chat_if_absent(
    current_user_id: &str,
    friend_id: &str,
    message: &str,
) -> Result<CreateChatOutcome, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = wire::model::CreateIndividualChatRequest {
            current_user_id: current_user_id.to_owned(),
            friend_id: friend_id.to_owned(),
            message: message.to_owned(),
        };
        let resp = http::call(gloo_net::http::Request::post(INDIVIDUAL_CHAT_ENDPOINT).json(&body)).await?;
        http::decode(resp, "user").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (current_user_id, friend_id, message);
        Err(ApiError::Unavailable)
    }
}

// =============================================================================
// FRIENDS
// =============================================================================

/// # Errors
///
/// `NotFound` for unknown users.
pub async fn fetch_friends(user_id: &str) -> Result<Vec<Friend>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&friends_endpoint(user_id), "user").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user_id;
        Err(ApiError::Unavailable)
    }
}

/// Pending requests addressed to `user_id`.
///
/// # Errors
///
/// `NotFound` for unknown users.
pub async fn fetch_friend_requests(user_id: &str) -> Result<Vec<Friend>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&friend_requests_endpoint(user_id), "user").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user_id;
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// `NotFound` for unknown users; `Status(409)` when already friends.
pub async fn send_friend_request(from_uid: &str, to_uid: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = friend_edge(from_uid, to_uid);
        let resp = http::call(gloo_net::http::Request::post(FRIEND_REQUEST_ENDPOINT).json(&body)).await?;
        http::ensure_ok(&resp, "user")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (from_uid, to_uid);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// `NotFound` when no such pending request exists.
pub async fn accept_friend_request(from_uid: &str, to_uid: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = friend_edge(from_uid, to_uid);
        let resp = http::call(gloo_net::http::Request::post(FRIEND_ACCEPT_ENDPOINT).json(&body)).await?;
        http::ensure_ok(&resp, "friend request")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (from_uid, to_uid);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// `NotFound` when no such pending request exists.
pub async fn reject_friend_request(from_uid: &str, to_uid: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = friend_edge(from_uid, to_uid);
        let resp = http::call(gloo_net::http::Request::delete(FRIEND_REQUEST_ENDPOINT).json(&body)).await?;
        http::ensure_ok(&resp, "friend request")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (from_uid, to_uid);
        Err(ApiError::Unavailable)
    }
}

#[cfg(feature = "hydrate")]
fn friend_edge(from_uid: &str, to_uid: &str) -> wire::model::FriendRequestBody {
    wire::model::FriendRequestBody {
        from_uid: from_uid.to_owned(),
        to_uid: to_uid.to_owned(),
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Exchange credentials for the user's id.
///
/// # Errors
///
/// `Unauthorized(401)` for bad credentials.
pub async fn login(email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = wire::model::LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let resp = http::call(gloo_net::http::Request::post("/api/auth/login").json(&body)).await?;
        http::decode(resp, "account").await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err(ApiError::Unavailable)
    }
}

/// Create an account, then mark its email verified.
///
/// # Errors
///
/// `Status(409)` when the email is taken.
pub async fn register(email: &str, password: &str, username: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = wire::model::RegisterRequest {
            email: email.to_owned(),
            password: password.to_owned(),
            username: username.to_owned(),
        };
        let created = http::call(gloo_net::http::Request::post("/api/auth/createUser").json(&body)).await?;
        http::ensure_ok(&created, "account")?;

        let verified = http::call(
            gloo_net::http::Request::post("/api/auth/verifyUser")
                .query([("email", email)])
                .build(),
        )
        .await?;
        http::ensure_ok(&verified, "account")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password, username);
        Err(ApiError::Unavailable)
    }
}

/// # Errors
///
/// Propagates transport and status failures.
pub async fn logout(email: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = http::call(
            gloo_net::http::Request::post("/api/auth/logout")
                .query([("email", email)])
                .build(),
        )
        .await?;
        http::ensure_ok(&resp, "account")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = email;
        Err(ApiError::Unavailable)
    }
}
