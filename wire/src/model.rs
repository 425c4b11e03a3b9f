//! JSON records shared by the HTTP API and realtime payloads.
//!
//! Field names follow the backend's camelCase JSON (`chatId`, `lastMessage`,
//! `unreadCount`, `chatUser`). Keyed collections are `BTreeMap`s so
//! serialized snapshots are deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// MESSAGES
// =============================================================================

/// Authoritative message record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub chat_id: String,
    pub sender: String,
    #[serde(default)]
    pub content: String,
    /// RFC 3339 instant. `None` only for records that never carried one.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub read: bool,
}

/// Partial message as it may arrive from a realtime batch: only `id` is
/// guaranteed, every other field may be absent or null.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
}

impl From<Message> for MessagePatch {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            chat_id: Some(message.chat_id),
            sender: Some(message.sender),
            content: Some(message.content),
            timestamp: message.timestamp,
            read: Some(message.read),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub sender: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    pub content: String,
}

// =============================================================================
// CHATS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    #[default]
    Individual,
    Group,
}

/// Full chat record. Never used where a summary is expected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ChatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub messages: BTreeMap<String, Message>,
}

impl Chat {
    /// True when this is an individual chat whose participant set is exactly
    /// `{a, b}`, regardless of order or duplicates.
    #[must_use]
    pub fn is_individual_between(&self, a: &str, b: &str) -> bool {
        if self.kind != ChatKind::Individual || a == b {
            return false;
        }
        let mut set: Vec<&str> = self.participants.iter().map(String::as_str).collect();
        set.sort_unstable();
        set.dedup();
        let mut want = [a, b];
        want.sort_unstable();
        set == want
    }

    /// The participant that is not `user_id` in a two-person chat.
    #[must_use]
    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        if self.participants.len() != 2 {
            return None;
        }
        self.participants
            .iter()
            .map(String::as_str)
            .find(|p| *p != user_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndividualChatRequest {
    pub current_user_id: String,
    pub friend_id: String,
    pub message: String,
}

/// Result of create-individual-chat-if-absent. Exactly one outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatOutcome {
    pub already_exists: bool,
    pub chat_id: String,
}

// =============================================================================
// USERS
// =============================================================================

/// Denormalized per-user view of one chat, stored under `User::chat_user`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummaryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub last_user: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Active,
    #[default]
    Pending,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendLink {
    #[serde(default)]
    pub status: FriendStatus,
    #[serde(default)]
    pub since: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub friends: BTreeMap<String, FriendLink>,
    #[serde(default)]
    pub chat_user: BTreeMap<String, ChatSummaryEntry>,
    /// Incoming requests keyed by sender uid; value is `"pending"`.
    #[serde(default)]
    pub friend_requests: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

// =============================================================================
// FRIENDS
// =============================================================================

/// Row of the friend list or the pending-request list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub friendship_status: FriendStatus,
    #[serde(default)]
    pub since: Option<String>,
}

/// Directed edge `from_uid -> to_uid`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub from_uid: String,
    pub to_uid: String,
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub local_id: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

// =============================================================================
// REALTIME PAYLOADS
// =============================================================================

/// Payload of `users:snapshot`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersSnapshot {
    pub users: BTreeMap<String, User>,
}

/// Payload of `chats:messages`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesBatch {
    pub chat_id: String,
    #[serde(default)]
    pub messages: Vec<MessagePatch>,
}

/// Payload of `channel:subscribe`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscribe {
    pub topics: Vec<crate::Topic>,
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
