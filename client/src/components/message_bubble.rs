//! A single message in the chat view.
//!
//! DESIGN
//! ======
//! Own messages are right-aligned, carry the delivery tick, and expose an
//! action menu (edit, delete). The bubble holds no state of its own; the menu
//! and edit flags live in `ChatViewState` so only one menu is open at a time.

use leptos::prelude::*;
use wire::model::Message;

use crate::state::chat_view::delivery_mark;
use crate::util::time;

#[component]
pub fn MessageBubble(
    message: Message,
    viewer_id: String,
    #[prop(into)] menu_open: Signal<bool>,
    on_menu: Callback<String>,
    on_edit: Callback<String>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let own = message.sender == viewer_id;
    let mark = delivery_mark(&message, &viewer_id).unwrap_or_default();
    let at = time::message_time_label(message.timestamp.as_deref(), time::local_offset());
    let id_menu = message.id.clone();
    let id_edit = message.id.clone();
    let id_delete = message.id.clone();

    view! {
        <div
            class="message"
            class:message--own=own
            class:message--other=!own
            data-message-id=message.id.clone()
        >
            <p class="message__content">{message.content.clone()}</p>
            <span class="message__meta">
                <span class="message__time">{at}</span>
                <span class="message__mark" class:message__mark--read=message.read>{mark}</span>
            </span>
            <Show when=move || own>
                <button
                    class="message__menu-toggle"
                    title="Message actions"
                    on:click={
                        let id = id_menu.clone();
                        move |_| on_menu.run(id.clone())
                    }
                >
                    "⋮"
                </button>
            </Show>
            <Show when=move || own && menu_open.get()>
                <div class="message__menu">
                    <button
                        class="message__menu-item"
                        on:click={
                            let id = id_edit.clone();
                            move |_| on_edit.run(id.clone())
                        }
                    >
                        "Edit"
                    </button>
                    <button
                        class="message__menu-item message__menu-item--danger"
                        on:click={
                            let id = id_delete.clone();
                            move |_| on_delete.run(id.clone())
                        }
                    >
                        "Delete"
                    </button>
                </div>
            </Show>
        </div>
    }
}
