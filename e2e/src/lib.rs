//! End-to-end flow harness against a running chat server.
//!
//! The harness talks to the server the way the browser client does: REST
//! calls for reads and mutations, and a binary-protobuf websocket for the
//! `users` / `chats` topics. Deliveries are fed through the client's own
//! reconciliation and read-tracking code so the flows exercise the same
//! decisions the UI makes.

use std::collections::BTreeMap;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info};
use wire::model::{
    LoginRequest, LoginResponse, Message, MessagesBatch, SendMessageRequest, Subscribe, User, UsersSnapshot,
};
use wire::{Frame, Status, Topic, topic};

/// Seed chat shared by the default sender and receiver.
pub const DEFAULT_CHAT_ID: &str = "c-marco-luigi";

/// Runtime configuration for flow tests, loaded from environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct E2eConfig {
    /// HTTP base URL of the server under test.
    pub base_url: String,
    pub sender: Account,
    pub receiver: Account,
    /// Individual chat between sender and receiver.
    pub chat_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub email: String,
    pub password: String,
}

impl E2eConfig {
    /// Load config from `E2E_*` variables, defaulting to the bundled dev seed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
        };
        Self {
            base_url: get("E2E_BASE_URL", "http://127.0.0.1:8080"),
            sender: Account {
                email: get("E2E_SENDER_EMAIL", "marco.rossi@example.com"),
                password: get("E2E_SENDER_PASSWORD", "password1"),
            },
            receiver: Account {
                email: get("E2E_RECEIVER_EMAIL", "luigi.bianchi@example.com"),
                password: get("E2E_RECEIVER_PASSWORD", "password2"),
            },
            chat_id: get("E2E_CHAT_ID", DEFAULT_CHAT_ID),
        }
    }
}

/// Error type for flow harness operations.
#[derive(Debug, thiserror::Error)]
pub enum E2eError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket failed: {0}")]
    Ws(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("frame decode failed: {0}")]
    Decode(#[from] wire::CodecError),
    #[error("payload decode failed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
    #[error("server returned error status for {syscall}: {message}")]
    ServerError { syscall: String, message: String },
}

impl From<tokio_tungstenite::tungstenite::Error> for E2eError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Ws(Box::new(e))
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// REST client for one logged-in user.
pub struct ApiSession {
    http: reqwest::Client,
    base_url: String,
    pub user_id: String,
}

impl ApiSession {
    /// Log in and keep the returned `localId`.
    ///
    /// # Errors
    ///
    /// Transport errors or a non-success status (401 for bad credentials).
    pub async fn login(base_url: &str, account: &Account) -> Result<Self, E2eError> {
        let http = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_owned();
        let resp: LoginResponse = http
            .post(format!("{base_url}/api/auth/login"))
            .json(&LoginRequest { email: account.email.clone(), password: account.password.clone() })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(user_id = %resp.local_id, "e2e: logged in");
        Ok(Self { http, base_url, user_id: resp.local_id })
    }

    /// # Errors
    ///
    /// Transport or status errors.
    pub async fn user(&self, user_id: &str) -> Result<User, E2eError> {
        self.get(&format!("/api/users/{user_id}")).await
    }

    /// # Errors
    ///
    /// Transport or status errors.
    pub async fn messages(&self, chat_id: &str) -> Result<Vec<Message>, E2eError> {
        self.get(&format!("/api/messages/{chat_id}")).await
    }

    /// # Errors
    ///
    /// Transport or status errors.
    pub async fn send(&self, chat_id: &str, content: &str) -> Result<Message, E2eError> {
        let body = SendMessageRequest { content: content.to_owned(), sender: self.user_id.clone() };
        self.post(&format!("/api/messages/{chat_id}/send"), &body).await
    }

    /// # Errors
    ///
    /// Transport or status errors.
    pub async fn mark_read(&self, chat_id: &str) -> Result<(), E2eError> {
        self.http
            .put(format!("{}/api/users/markChatAsRead/{chat_id}", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, E2eError> {
        Ok(self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, E2eError> {
        Ok(self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

// =============================================================================
// WEBSOCKET
// =============================================================================

/// One realtime connection.
pub struct ChannelSession {
    stream: tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
}

impl ChannelSession {
    /// Connect to `/api/ws` and wait for `session:connected`.
    ///
    /// # Errors
    ///
    /// URL conversion, handshake, or timeout errors.
    pub async fn connect(base_url: &str) -> Result<Self, E2eError> {
        let (stream, _) = connect_async(ws_url(base_url)?).await?;
        let mut session = Self { stream };
        loop {
            let frame = session.recv_next(Duration::from_secs(5)).await?;
            if frame.syscall == topic::SESSION_CONNECTED {
                return Ok(session);
            }
        }
    }

    /// Replace the connection's topics and wait for the server's `Done`.
    ///
    /// # Errors
    ///
    /// Socket errors, or an error-status reply.
    pub async fn subscribe(&mut self, topics: &[Topic]) -> Result<(), E2eError> {
        let request = Frame {
            id: uuid::Uuid::new_v4().to_string(),
            parent_id: None,
            ts: 0,
            chat_id: None,
            from: None,
            syscall: topic::CHANNEL_SUBSCRIBE.to_owned(),
            status: Status::Request,
            data: serde_json::to_value(Subscribe { topics: topics.to_vec() })?,
        };
        self.stream
            .send(WsMessage::Binary(wire::encode_frame(&request).into()))
            .await?;

        loop {
            let frame = self.recv_next(Duration::from_secs(5)).await?;
            if frame.parent_id.as_deref() != Some(request.id.as_str()) {
                continue;
            }
            if frame.status == Status::Error {
                let message = frame
                    .data
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("subscribe failed")
                    .to_owned();
                return Err(E2eError::ServerError { syscall: frame.syscall, message });
            }
            return Ok(());
        }
    }

    /// Next message batch for `chat_id`, skipping other deliveries.
    ///
    /// # Errors
    ///
    /// Timeout, socket, or payload errors.
    pub async fn next_batch(&mut self, chat_id: &str, deadline: Duration) -> Result<MessagesBatch, E2eError> {
        tokio::time::timeout(deadline, async {
            loop {
                let frame = self.recv_next(deadline).await?;
                if frame.syscall == topic::CHATS_MESSAGES && frame.chat_id.as_deref() == Some(chat_id) {
                    return Ok(serde_json::from_value(frame.data)?);
                }
            }
        })
        .await
        .map_err(|_| E2eError::Timeout("message batch"))?
    }

    /// Next users snapshot satisfying `pred`.
    ///
    /// # Errors
    ///
    /// Timeout, socket, or payload errors.
    pub async fn users_until(
        &mut self,
        deadline: Duration,
        pred: impl Fn(&BTreeMap<String, User>) -> bool,
    ) -> Result<BTreeMap<String, User>, E2eError> {
        tokio::time::timeout(deadline, async {
            loop {
                let frame = self.recv_next(deadline).await?;
                if frame.syscall != topic::USERS_SNAPSHOT {
                    continue;
                }
                let snapshot: UsersSnapshot = serde_json::from_value(frame.data)?;
                if pred(&snapshot.users) {
                    return Ok(snapshot.users);
                }
            }
        })
        .await
        .map_err(|_| E2eError::Timeout("users snapshot"))?
    }

    async fn recv_next(&mut self, deadline: Duration) -> Result<Frame, E2eError> {
        let fut = async {
            loop {
                let Some(msg) = self.stream.next().await else {
                    return Err(E2eError::WsClosed);
                };
                match msg? {
                    WsMessage::Binary(bytes) => {
                        let frame = wire::decode_frame(&bytes)?;
                        debug!(syscall = %frame.syscall, "e2e: recv frame");
                        return Ok(frame);
                    }
                    WsMessage::Close(_) => return Err(E2eError::WsClosed),
                    _ => {}
                }
            }
        };
        tokio::time::timeout(deadline, fut)
            .await
            .map_err(|_| E2eError::Timeout("frame"))?
    }
}

fn ws_url(base_url: &str) -> Result<String, E2eError> {
    let trimmed = base_url.trim_end_matches('/');
    if let Some(rest) = trimmed.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/api/ws"));
    }
    if let Some(rest) = trimmed.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/api/ws"));
    }
    Err(E2eError::InvalidBaseUrl(base_url.to_owned()))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod lib_test;

#[cfg(test)]
#[path = "flows_test.rs"]
mod flows_test;
