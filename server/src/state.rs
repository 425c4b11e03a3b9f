//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the in-memory store and a broadcast hub. Route handlers mutate the
//! store, then call [`AppState::publish`] with the topics the mutation
//! touched; every websocket connection holds a hub receiver and forwards the
//! frames its subscription accepts.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;
use wire::model::{MessagePatch, MessagesBatch, UsersSnapshot};
use wire::{Frame, Status, topic};

use crate::store::Store;

/// Frames buffered per subscriber before it starts lagging.
const HUB_CAPACITY: usize = 256;

/// What a mutation touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Any user record, including `chatUser` summaries.
    Users,
    /// The message list of one chat.
    Chat(String),
}

/// Shared application state. Clone is required by Axum; inner fields are
/// Arc-backed.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub hub: broadcast::Sender<Frame>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store) -> Self {
        let (hub, _) = broadcast::channel(HUB_CAPACITY);
        Self { store: Arc::new(RwLock::new(store)), hub }
    }

    /// Broadcast the current state of everything in `changes`.
    pub async fn publish(&self, changes: &[Change]) {
        let frames = {
            let store = self.store.read().await;
            changes
                .iter()
                .filter_map(|change| change_frame(&store, change))
                .collect::<Vec<_>>()
        };
        for frame in frames {
            // No receivers just means nobody is connected.
            let _ = self.hub.send(frame);
        }
    }
}

fn change_frame(store: &Store, change: &Change) -> Option<Frame> {
    match change {
        Change::Users => Some(users_snapshot_frame(store)),
        Change::Chat(chat_id) => chat_messages_frame(store, chat_id),
    }
}

/// `users:snapshot` carrying every user record.
pub fn users_snapshot_frame(store: &Store) -> Frame {
    let payload = UsersSnapshot { users: store.users().clone() };
    server_frame(topic::USERS_SNAPSHOT, None, serde_json::to_value(payload).unwrap_or_default())
}

/// `chats:messages` carrying the chat's full ordered message list. `None`
/// when the chat no longer exists.
pub fn chat_messages_frame(store: &Store, chat_id: &str) -> Option<Frame> {
    let messages = store.messages(chat_id).ok()?;
    let payload = MessagesBatch {
        chat_id: chat_id.to_owned(),
        messages: messages.into_iter().map(MessagePatch::from).collect(),
    };
    Some(server_frame(
        topic::CHATS_MESSAGES,
        Some(chat_id.to_owned()),
        serde_json::to_value(payload).unwrap_or_default(),
    ))
}

pub fn server_frame(syscall: &str, chat_id: Option<String>, data: serde_json::Value) -> Frame {
    Frame {
        id: Uuid::new_v4().to_string(),
        parent_id: None,
        ts: chrono::Utc::now().timestamp_millis(),
        chat_id,
        from: Some("server".to_owned()),
        syscall: syscall.to_owned(),
        status: Status::Item,
        data,
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
