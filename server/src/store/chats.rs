//! Chat and message mutations.
//!
//! Every mutation that changes which message is newest rewrites the
//! participants' `chatUser` entries so the home list stays in step with the
//! chat itself.

#[cfg(test)]
#[path = "chats_test.rs"]
mod chats_test;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;
use wire::model::{Chat, ChatKind, CreateChatOutcome, Message};

use super::{Store, StoreError, ordered_messages, stamp};

/// Summary name for a group or an unnamed chat.
const FALLBACK_CHAT_NAME: &str = "Chat";

impl Store {
    /// Append a message and bump every participant's unread count.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown chats; `Invalid` for blank content or a sender
    /// outside the chat.
    pub fn send_message(
        &mut self,
        chat_id: &str,
        sender: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Message, StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::Invalid("message content is empty".to_owned()));
        }
        let chat = self.chat_mut(chat_id)?;
        if !chat.participants.iter().any(|p| p == sender) {
            return Err(StoreError::Invalid(format!("{sender} is not in chat {chat_id}")));
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.to_owned(),
            sender: sender.to_owned(),
            content: content.to_owned(),
            timestamp: Some(stamp(now)),
            read: false,
        };
        chat.messages.insert(message.id.clone(), message.clone());
        self.refresh_summaries(chat_id, 1)?;

        info!(%chat_id, message_id = %message.id, %sender, "store: message sent");
        Ok(message)
    }

    /// Replace a message's content.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown chat or message; `Invalid` for blank content.
    pub fn update_message(&mut self, chat_id: &str, message_id: &str, content: &str) -> Result<(), StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::Invalid("message content is empty".to_owned()));
        }
        let message = self
            .chat_mut(chat_id)?
            .messages
            .get_mut(message_id)
            .ok_or_else(|| StoreError::NotFound(format!("message {message_id}")))?;
        content.clone_into(&mut message.content);
        self.refresh_summaries(chat_id, 0)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown chat or message.
    pub fn delete_message(&mut self, chat_id: &str, message_id: &str) -> Result<(), StoreError> {
        self.chat_mut(chat_id)?
            .messages
            .remove(message_id)
            .ok_or_else(|| StoreError::NotFound(format!("message {message_id}")))?;
        self.refresh_summaries(chat_id, 0)
    }

    /// Zero every participant's unread count and mark every message read.
    ///
    /// Returns whether anything changed, so callers only publish real
    /// transitions.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown chats.
    pub fn mark_chat_read(&mut self, chat_id: &str) -> Result<bool, StoreError> {
        let chat = self.chat_mut(chat_id)?;
        let mut changed = false;
        for message in chat.messages.values_mut().filter(|m| !m.read) {
            message.read = true;
            changed = true;
        }
        let participants = chat.participants.clone();
        for uid in &participants {
            let Some(entry) = self.users.get_mut(uid).and_then(|u| u.chat_user.get_mut(chat_id)) else {
                continue;
            };
            if entry.unread_count > 0 {
                entry.unread_count = 0;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Open the individual chat between `current_user_id` and `friend_id`,
    /// creating it with `message` as the first message when none exists.
    ///
    /// # Errors
    ///
    /// `NotFound` when either user is unknown; `Invalid` when both ids are the
    /// same or the message is blank.
    pub fn create_individual_chat_if_absent(
        &mut self,
        current_user_id: &str,
        friend_id: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Result<CreateChatOutcome, StoreError> {
        self.user(current_user_id)?;
        self.user(friend_id)?;
        if current_user_id == friend_id {
            return Err(StoreError::Invalid("cannot chat with yourself".to_owned()));
        }
        if let Some(existing) = self
            .chats
            .values()
            .find(|c| c.is_individual_between(current_user_id, friend_id))
        {
            return Ok(CreateChatOutcome { already_exists: true, chat_id: existing.id.clone() });
        }
        if message.trim().is_empty() {
            return Err(StoreError::Invalid("first message is empty".to_owned()));
        }

        let chat_id = Uuid::new_v4().to_string();
        let first = Message {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.clone(),
            sender: current_user_id.to_owned(),
            content: message.to_owned(),
            timestamp: Some(stamp(now)),
            read: false,
        };
        let chat = Chat {
            id: chat_id.clone(),
            kind: ChatKind::Individual,
            name: None,
            participants: vec![current_user_id.to_owned(), friend_id.to_owned()],
            messages: [(first.id.clone(), first)].into_iter().collect(),
        };
        self.chats.insert(chat_id.clone(), chat);
        self.refresh_summaries(&chat_id, 1)?;

        info!(%chat_id, %current_user_id, %friend_id, "store: individual chat created");
        Ok(CreateChatOutcome { already_exists: false, chat_id })
    }

    /// Rewrite every participant's summary from the chat's newest message,
    /// adding `unread_delta` to each unread count.
    fn refresh_summaries(&mut self, chat_id: &str, unread_delta: u32) -> Result<(), StoreError> {
        let chat = self.chat(chat_id)?;
        let newest = ordered_messages(chat).pop();
        let names: Vec<(String, String)> = chat
            .participants
            .iter()
            .map(|uid| (uid.clone(), self.summary_name(chat, uid)))
            .collect();

        for (uid, name) in names {
            let Some(user) = self.users.get_mut(&uid) else {
                continue;
            };
            let entry = user.chat_user.entry(chat_id.to_owned()).or_default();
            entry.name = name;
            match &newest {
                Some(m) => {
                    entry.last_message.clone_from(&m.content);
                    entry.last_user.clone_from(&m.sender);
                    entry.timestamp.clone_from(&m.timestamp);
                }
                None => {
                    entry.last_message.clear();
                    entry.last_user.clear();
                    entry.timestamp = None;
                }
            }
            entry.unread_count = entry.unread_count.saturating_add(unread_delta);
        }
        Ok(())
    }

    /// The other participant's username in a two-person chat, else the group
    /// name or a fallback.
    fn summary_name(&self, chat: &Chat, viewer_id: &str) -> String {
        if let Some(other) = chat.other_participant(viewer_id) {
            if let Some(user) = self.users.get(other) {
                return user.username.clone();
            }
        }
        chat.name.clone().unwrap_or_else(|| FALLBACK_CHAT_NAME.to_owned())
    }
}
