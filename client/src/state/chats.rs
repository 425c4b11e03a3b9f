//! Chat summary list shown on the home route.
//!
//! The list is always rebuilt wholesale from the viewer's user record
//! (`chatUser`), never patched in place, so it cannot drift from the backend's
//! denormalized summaries.

#[cfg(test)]
#[path = "chats_test.rs"]
mod chats_test;

use wire::model::{ChatSummaryEntry, User};

use crate::util::time;

/// One row of the chat list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat_id: String,
    pub name: String,
    pub last_message: String,
    pub last_user: String,
    pub timestamp: Option<String>,
    pub unread_count: u32,
}

impl ChatSummary {
    pub fn from_entry(chat_id: &str, entry: &ChatSummaryEntry) -> Self {
        Self {
            chat_id: chat_id.to_owned(),
            name: entry.name.clone(),
            last_message: entry.last_message.clone(),
            last_user: entry.last_user.clone(),
            timestamp: entry.timestamp.clone(),
            unread_count: entry.unread_count,
        }
    }
}

/// Summaries for `user`, newest first. Ties and unparseable timestamps keep
/// chat-id order.
pub fn summaries_for(user: &User) -> Vec<ChatSummary> {
    let mut list: Vec<ChatSummary> = user
        .chat_user
        .iter()
        .map(|(chat_id, entry)| ChatSummary::from_entry(chat_id, entry))
        .collect();
    list.sort_by_key(|s| std::cmp::Reverse(time::sort_key(s.timestamp.as_deref())));
    list
}

/// Read/unread indicator for a list row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadBadge {
    None,
    /// Viewer wrote the last message and the other side has not read it.
    Sent,
    /// Viewer wrote the last message and it has been read.
    Seen,
    /// Unread messages from someone else, with the display label.
    Unread(String),
}

impl ReadBadge {
    /// Glyph rendered next to the last message preview.
    pub fn mark(&self) -> &str {
        match self {
            Self::None => "",
            Self::Sent => "✓",
            Self::Seen => "✓✓",
            Self::Unread(label) => label,
        }
    }
}

pub fn read_badge(summary: &ChatSummary, viewer_id: &str) -> ReadBadge {
    if summary.last_user == viewer_id {
        return if summary.unread_count > 0 { ReadBadge::Sent } else { ReadBadge::Seen };
    }
    unread_label(summary.unread_count).map_or(ReadBadge::None, ReadBadge::Unread)
}

/// `None` for zero, the count up to nine, `"9+"` above.
pub fn unread_label(count: u32) -> Option<String> {
    match count {
        0 => None,
        1..=9 => Some(count.to_string()),
        _ => Some("9+".to_owned()),
    }
}

/// Case-insensitive substring match on chat name. Blank queries match all.
pub fn filter_by_name<'a>(list: &'a [ChatSummary], query: &str) -> Vec<&'a ChatSummary> {
    let needle = query.trim().to_lowercase();
    list.iter()
        .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
        .collect()
}
