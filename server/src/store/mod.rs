//! In-memory data store behind the dev REST API.
//!
//! DESIGN
//! ======
//! One `Store` holds every user, chat and credential. It is seeded from JSON
//! at startup and mutated only through the operations in the submodules, each
//! of which keeps the per-user `chatUser` summaries consistent with the chat
//! it touched. The store is synchronous; `AppState` wraps it in a
//! `tokio::sync::RwLock` and publishes realtime frames after mutations.
//!
//! ERROR HANDLING
//! ==============
//! Every fallible operation returns `StoreError`, which maps one-to-one onto
//! an HTTP status in the route layer.

pub mod accounts;
pub mod chats;
pub mod friends;


use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use wire::model::{Chat, Message, User};

/// Seed bundled into the binary, used when `SEED_PATH` is unset.
pub const DEFAULT_SEED: &str = include_str!("../../seed/dev-seed.json");

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid request: {0}")]
    Invalid(String),
}

/// Login record keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub uid: String,
    pub password: String,
    #[serde(default = "verified_by_default")]
    pub verified: bool,
}

fn verified_by_default() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct Seed {
    #[serde(default)]
    users: BTreeMap<String, User>,
    #[serde(default)]
    credentials: BTreeMap<String, Credential>,
    #[serde(default)]
    chats: BTreeMap<String, Chat>,
}

#[derive(Debug, Default)]
pub struct Store {
    users: BTreeMap<String, User>,
    chats: BTreeMap<String, Chat>,
    credentials: BTreeMap<String, Credential>,
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

impl Store {
    /// Build a store from seed JSON.
    ///
    /// Map keys are authoritative: a user or chat whose `id` field disagrees
    /// with its key takes the key, and messages inherit their chat's id.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the seed is malformed.
    pub fn from_seed_json(raw: &str) -> Result<Self, serde_json::Error> {
        let seed: Seed = serde_json::from_str(raw)?;
        let users = seed
            .users
            .into_iter()
            .map(|(id, mut user)| {
                user.id.clone_from(&id);
                (id, user)
            })
            .collect();
        let chats = seed
            .chats
            .into_iter()
            .map(|(id, mut chat)| {
                chat.id.clone_from(&id);
                for (message_id, message) in &mut chat.messages {
                    message.id.clone_from(message_id);
                    message.chat_id.clone_from(&id);
                }
                (id, chat)
            })
            .collect();
        Ok(Self { users, chats, credentials: seed.credentials })
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn users(&self) -> &BTreeMap<String, User> {
        &self.users
    }

    /// # Errors
    ///
    /// `NotFound` for unknown ids.
    pub fn user(&self, user_id: &str) -> Result<&User, StoreError> {
        self.users
            .get(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    /// # Errors
    ///
    /// `NotFound` for unknown ids.
    pub fn chat(&self, chat_id: &str) -> Result<&Chat, StoreError> {
        self.chats
            .get(chat_id)
            .ok_or_else(|| StoreError::NotFound(format!("chat {chat_id}")))
    }

    /// A chat's messages ordered by timestamp, oldest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown chats.
    pub fn messages(&self, chat_id: &str) -> Result<Vec<Message>, StoreError> {
        Ok(ordered_messages(self.chat(chat_id)?))
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut User, StoreError> {
        self.users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    fn chat_mut(&mut self, chat_id: &str) -> Result<&mut Chat, StoreError> {
        self.chats
            .get_mut(chat_id)
            .ok_or_else(|| StoreError::NotFound(format!("chat {chat_id}")))
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Stable ascending sort by timestamp; ties keep id order.
pub(crate) fn ordered_messages(chat: &Chat) -> Vec<Message> {
    let mut messages: Vec<Message> = chat.messages.values().cloned().collect();
    messages.sort_by_key(|m| wire::time::sort_key(m.timestamp.as_deref()));
    messages
}

pub(crate) fn stamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
