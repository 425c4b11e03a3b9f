//! One row of the home chat list.

use leptos::prelude::*;

use crate::state::chats::{ChatSummary, ReadBadge, read_badge};
use crate::util::time;

/// Clickable summary row: name, last message preview, relative time, and the
/// read/unread badge.
#[component]
pub fn ChatRow(summary: ChatSummary, viewer_id: String, on_open: Callback<ChatSummary>) -> impl IntoView {
    let badge = read_badge(&summary, &viewer_id);
    let when = time::relative_time_label(summary.timestamp.as_deref(), time::now_local());
    let own_last = summary.last_user == viewer_id;
    let preview = if own_last {
        format!("You: {}", summary.last_message)
    } else {
        summary.last_message.clone()
    };
    let unread = matches!(badge, ReadBadge::Unread(_));
    let mark = badge.mark().to_owned();
    let name = summary.name.clone();
    let chat_id = summary.chat_id.clone();

    view! {
        <li
            class="chat-row"
            class:chat-row--unread=unread
            data-chat-id=chat_id
            on:click=move |_| on_open.run(summary.clone())
        >
            <span class="chat-row__avatar" aria-hidden="true">
                {name.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default()}
            </span>
            <span class="chat-row__body">
                <span class="chat-row__name">{name}</span>
                <span class="chat-row__preview">{preview}</span>
            </span>
            <span class="chat-row__meta">
                <span class="chat-row__time">{when}</span>
                <span
                    class="chat-row__badge"
                    class:chat-row__badge--count=unread
                    class:chat-row__badge--seen=matches!(badge, ReadBadge::Seen)
                >
                    {mark}
                </span>
            </span>
        </li>
    }
}
