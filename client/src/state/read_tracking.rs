//! When a chat counts as read.
//!
//! The chat view re-evaluates [`should_mark_read`] on mount, on every change
//! to its message sequence, on window focus and on `visibilitychange`. The
//! mark-read call itself is best-effort and lives with the page.

#[cfg(test)]
#[path = "read_tracking_test.rs"]
mod read_tracking_test;

use wire::model::Message;

use crate::state::chats::ChatSummary;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Focused,
    Unfocused,
}

/// Everything the read predicate looks at.
#[derive(Clone, Copy, Debug)]
pub struct ReadContext<'a> {
    pub messages: &'a [Message],
    pub viewer_id: Option<&'a str>,
    pub chat_id: Option<&'a str>,
    pub visibility: Visibility,
    pub focus: Focus,
}

/// True when the viewer is actually looking at the chat and the newest
/// message came from someone else.
pub fn should_mark_read(ctx: &ReadContext<'_>) -> bool {
    if ctx.visibility != Visibility::Visible || ctx.focus != Focus::Focused {
        return false;
    }
    let (Some(viewer), Some(_chat)) = (ctx.viewer_id, ctx.chat_id) else {
        return false;
    };
    ctx.messages
        .last()
        .is_some_and(|last| last.sender != viewer)
}

/// Opening a chat from the list marks it read first when it has unread
/// messages that the viewer did not write.
pub fn should_mark_on_open(summary: &ChatSummary, viewer_id: &str) -> bool {
    summary.unread_count > 0 && summary.last_user != viewer_id
}
