//! State owned by the open chat view.
//!
//! DESIGN
//! ======
//! The view owns its message sequence and its realtime subscription. When the
//! route unmounts, [`ChatViewState::teardown`] clears the messages and flips a
//! guard; fetches and batches that resolve afterwards become no-ops instead
//! of resurrecting a dead view.
//!
//! An early realtime batch can still be overwritten by a slower initial fetch
//! (last callback wins). The next batch after the fetch restores it.

#[cfg(test)]
#[path = "chat_view_test.rs"]
mod chat_view_test;

use wire::model::{Chat, ChatKind, Message, MessagesBatch};

use crate::net::api::{ApiError, ErrorKind};
use crate::state::messages;
use crate::state::users::UsersCache;

/// A load failure as the view renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ApiError> for ViewError {
    fn from(err: &ApiError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// In-progress edit of one of the viewer's messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    pub message_id: String,
    pub content: String,
}

#[derive(Clone, Debug, Default)]
pub struct ChatViewState {
    pub chat_id: Option<String>,
    pub chat: Option<Chat>,
    pub messages: Vec<Message>,
    pub loading: bool,
    pub error: Option<ViewError>,
    pub draft: String,
    pub sending: bool,
    /// Inline failure of the last send/edit/delete.
    pub action_error: Option<String>,
    pub editing: Option<EditDraft>,
    /// Message whose action menu is open.
    pub menu_for: Option<String>,
    pub torn_down: bool,
}

impl ChatViewState {
    /// Fresh state for a chat that is about to load.
    pub fn open(chat_id: &str) -> Self {
        Self {
            chat_id: Some(chat_id.to_owned()),
            loading: true,
            ..Self::default()
        }
    }

    /// Install the initial fetch, unless the view moved on to another chat or
    /// was torn down meanwhile.
    pub fn set_loaded(&mut self, chat: Chat, mut fetched: Vec<Message>) {
        if self.torn_down || self.chat_id.as_deref() != Some(chat.id.as_str()) {
            return;
        }
        messages::sort_by_time(&mut fetched);
        self.chat = Some(chat);
        self.messages = fetched;
        self.loading = false;
        self.error = None;
    }

    pub fn set_failed(&mut self, chat_id: &str, err: &ApiError) {
        if self.torn_down || self.chat_id.as_deref() != Some(chat_id) {
            return;
        }
        self.loading = false;
        self.error = Some(ViewError::from(err));
    }

    /// Reconcile a realtime batch. Returns whether the visible messages changed.
    pub fn apply_batch(&mut self, batch: &MessagesBatch) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(chat_id) = self.chat_id.as_deref() else {
            return false;
        };
        if batch.chat_id != chat_id {
            return false;
        }
        match messages::merge_batch(&self.messages, &batch.messages, chat_id) {
            Some(merged) => {
                self.messages = merged;
                true
            }
            None => false,
        }
    }

    /// Show a message the backend just accepted without waiting for the
    /// realtime echo. The next batch reconciles it like any other record.
    pub fn record_sent(&mut self, message: Message) {
        if self.torn_down || self.chat_id.as_deref() != Some(message.chat_id.as_str()) {
            return;
        }
        match self.messages.iter_mut().find(|m| m.id == message.id) {
            Some(existing) => *existing = message,
            None => self.messages.push(message),
        }
        messages::sort_by_time(&mut self.messages);
    }

    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.messages.clear();
        self.editing = None;
        self.menu_for = None;
    }

    /// Start editing a message the viewer wrote.
    pub fn begin_edit(&mut self, message_id: &str, viewer_id: &str) -> bool {
        let Some(message) = self
            .messages
            .iter()
            .find(|m| m.id == message_id && m.sender == viewer_id)
        else {
            return false;
        };
        self.editing = Some(EditDraft {
            message_id: message.id.clone(),
            content: message.content.clone(),
        });
        self.menu_for = None;
        true
    }

    pub fn toggle_menu(&mut self, message_id: &str) {
        if self.menu_for.as_deref() == Some(message_id) {
            self.menu_for = None;
        } else {
            self.menu_for = Some(message_id.to_owned());
        }
    }
}

/// Header title: group name, or the other participant's username.
pub fn chat_title(chat: &Chat, viewer_id: &str, users: &UsersCache) -> String {
    if chat.kind == ChatKind::Group {
        return chat.name.clone().unwrap_or_else(|| "Group".to_owned());
    }
    chat.other_participant(viewer_id)
        .map(|other| users.display_name(other))
        .or_else(|| chat.name.clone())
        .unwrap_or_else(|| "Chat".to_owned())
}

/// Tick shown under the viewer's own messages: one when delivered, two when read.
pub fn delivery_mark(message: &Message, viewer_id: &str) -> Option<&'static str> {
    if message.sender != viewer_id {
        return None;
    }
    Some(if message.read { "✓✓" } else { "✓" })
}
