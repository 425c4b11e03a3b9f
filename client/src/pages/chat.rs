//! Chat page: one conversation with realtime updates and read tracking.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting loads the chat and its messages, opens a realtime channel for
//! `chats` (message batches) and `users` (name lookups), and installs focus
//! and visibility listeners. Whenever the message sequence, focus, or
//! visibility changes, the read policy decides whether to mark the chat read.
//! Unmounting removes the listeners, deactivates the channel and tears the
//! view state down.
//!
//! ERROR HANDLING
//! ==============
//! Load failures render through `ErrorPanel` by kind. Send/edit/delete
//! failures stay inline. Mark-read is best-effort: logged, never surfaced.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::error_panel::ErrorPanel;
use crate::components::message_bubble::MessageBubble;
use crate::net::channel::{self, ChannelConfig, ChannelEvent};
use crate::state::auth::AuthState;
use crate::state::chat_view::{ChatViewState, chat_title};
use crate::state::messages::group_by_day;
use crate::state::read_tracking::{Focus, ReadContext, should_mark_read};
use crate::state::users::UsersCache;
use crate::util::auth::install_unauth_redirect;
use crate::util::{browser, time};

#[component]
pub fn ChatPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let users = expect_context::<RwSignal<UsersCache>>();
    let view_state = expect_context::<RwSignal<ChatViewState>>();
    let params = use_params_map();
    let reload = RwSignal::new(0_u32);

    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let chat_id = Memo::new(move |_| params.with(|p| p.get("id")).unwrap_or_default());

    // =========================================================================
    // LOAD
    // =========================================================================

    Effect::new(move || {
        let _ = reload.get();
        let id = chat_id.get();
        if id.is_empty() || auth.get().session.is_none() {
            return;
        }
        view_state.set(ChatViewState::open(&id));
        leptos::task::spawn_local(load_chat(id, view_state, users));
    });

    // =========================================================================
    // REALTIME
    // =========================================================================

    let realtime = channel::open(ChannelConfig { users: true, messages: true }, move |event| match event {
        ChannelEvent::Messages(batch) => {
            view_state.try_update(|v| v.apply_batch(&batch));
        }
        ChannelEvent::Users(snapshot) => users.update(|u| u.replace_all(snapshot)),
    });
    realtime.activate();

    // =========================================================================
    // READ TRACKING
    // =========================================================================

    let visibility = RwSignal::new(browser::current_visibility());
    let focus = RwSignal::new(browser::current_focus());

    let focus_handle = window_event_listener_untyped("focus", move |_| focus.set(Focus::Focused));
    let blur_handle = window_event_listener_untyped("blur", move |_| focus.set(Focus::Unfocused));
    // `visibilitychange` fires on the document and bubbles to the window.
    let visibility_handle = window_event_listener_untyped("visibilitychange", move |_| {
        visibility.set(browser::current_visibility());
    });

    let messages = Memo::new(move |_| view_state.with(|v| v.messages.clone()));
    Effect::new(move || {
        let messages = messages.get();
        let session = auth.get().session;
        let id = chat_id.get();
        let ctx = ReadContext {
            messages: &messages,
            viewer_id: session.as_ref().map(|s| s.user_id.as_str()),
            chat_id: Some(id.as_str()).filter(|c| !c.is_empty()),
            visibility: visibility.get(),
            focus: focus.get(),
        };
        if should_mark_read(&ctx) {
            leptos::task::spawn_local(async move {
                if let Err(e) = crate::net::api::mark_chat_read(&id).await {
                    leptos::logging::warn!("mark read failed for {id}: {e}");
                }
            });
        }
    });

    on_cleanup({
        let realtime = realtime.clone();
        move || {
            focus_handle.remove();
            blur_handle.remove();
            visibility_handle.remove();
            realtime.deactivate();
            view_state.try_update(ChatViewState::teardown);
        }
    });

    // =========================================================================
    // ACTIONS
    // =========================================================================

    let viewer_id = move || auth.get().viewer_id().map(str::to_owned).unwrap_or_default();

    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let state = view_state.get_untracked();
        let content = state.draft.trim().to_owned();
        let Some(sender) = auth.get_untracked().viewer_id().map(str::to_owned) else {
            return;
        };
        if content.is_empty() || state.sending {
            return;
        }
        let id = chat_id.get_untracked();
        view_state.update(|v| {
            v.sending = true;
            v.action_error = None;
        });
        leptos::task::spawn_local(async move {
            match crate::net::api::send_message(&id, &sender, &content).await {
                Ok(message) => view_state.try_update(|v| {
                    v.draft.clear();
                    v.sending = false;
                    v.record_sent(message);
                }),
                Err(e) => view_state.try_update(|v| {
                    v.sending = false;
                    v.action_error = Some(format!("Message not sent: {e}"));
                }),
            };
        });
    };

    let on_menu = Callback::new(move |message_id: String| view_state.update(|v| v.toggle_menu(&message_id)));
    let on_edit = Callback::new(move |message_id: String| {
        let viewer = auth.get_untracked().viewer_id().map(str::to_owned).unwrap_or_default();
        view_state.update(|v| {
            v.begin_edit(&message_id, &viewer);
        });
    });
    let on_delete = Callback::new(move |message_id: String| {
        let id = chat_id.get_untracked();
        view_state.update(|v| v.menu_for = None);
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::delete_message(&id, &message_id).await {
                view_state.try_update(|v| v.action_error = Some(format!("Delete failed: {e}")));
            }
        });
    });
    let on_save_edit = move |_| {
        let Some(draft) = view_state.get_untracked().editing else {
            return;
        };
        let content = draft.content.trim().to_owned();
        if content.is_empty() {
            return;
        }
        let id = chat_id.get_untracked();
        view_state.update(|v| v.editing = None);
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::update_message(&id, &draft.message_id, &content).await {
                view_state.try_update(|v| v.action_error = Some(format!("Edit failed: {e}")));
            }
        });
    };
    let on_retry = Callback::new(move |()| reload.update(|n| *n += 1));

    let title = move || {
        let state = view_state.get();
        let viewer = viewer_id();
        users.with(|u| {
            state
                .chat
                .as_ref()
                .map(|c| chat_title(c, &viewer, u))
                .unwrap_or_default()
        })
    };

    // =========================================================================
    // VIEW
    // =========================================================================

    view! {
        <div class="chat-page">
            <header class="chat-page__header">
                <a class="chat-page__back" href="/">"←"</a>
                <span class="chat-page__title">{title}</span>
            </header>
            {move || {
                view_state
                    .get()
                    .error
                    .map(|error| view! { <ErrorPanel error=error on_retry=on_retry/> })
            }}
            <Show when=move || view_state.with(|v| v.loading && v.error.is_none())>
                <p class="chat-page__loading">"Loading messages..."</p>
            </Show>
            <div class="chat-page__messages">
                {move || {
                    let viewer = viewer_id();
                    let offset = time::local_offset();
                    let today = time::now_local().date_naive();
                    let groups = group_by_day(&messages.get(), offset);
                    groups
                        .into_iter()
                        .map(|group| {
                            let label = time::day_label(group.day, today);
                            let viewer = viewer.clone();
                            view! {
                                <section class="chat-page__day">
                                    <div class="chat-page__day-label">{label}</div>
                                    {group
                                        .messages
                                        .into_iter()
                                        .map(|message| {
                                            let id = message.id.clone();
                                            let menu_open = Signal::derive(move || {
                                                view_state.with(|v| v.menu_for.as_deref() == Some(id.as_str()))
                                            });
                                            view! {
                                                <MessageBubble
                                                    message=message
                                                    viewer_id=viewer.clone()
                                                    menu_open=menu_open
                                                    on_menu=on_menu
                                                    on_edit=on_edit
                                                    on_delete=on_delete
                                                />
                                            }
                                        })
                                        .collect_view()}
                                </section>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <Show when=move || view_state.with(|v| v.editing.is_some())>
                <div class="chat-page__edit">
                    <input
                        class="chat-page__edit-input"
                        type="text"
                        prop:value=move || {
                            view_state.with(|v| v.editing.as_ref().map(|d| d.content.clone()).unwrap_or_default())
                        }
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            view_state.update(|v| {
                                if let Some(draft) = v.editing.as_mut() {
                                    draft.content = value;
                                }
                            });
                        }
                    />
                    <button class="btn" on:click=on_save_edit>"Save"</button>
                    <button class="btn btn--ghost" on:click=move |_| view_state.update(|v| v.editing = None)>
                        "Cancel"
                    </button>
                </div>
            </Show>
            <Show when=move || view_state.with(|v| v.action_error.is_some())>
                <p class="chat-page__action-error">
                    {move || view_state.with(|v| v.action_error.clone().unwrap_or_default())}
                </p>
            </Show>
            <form class="chat-page__composer" on:submit=on_send>
                <input
                    id="message-input"
                    class="chat-page__input"
                    type="text"
                    placeholder="Write a message"
                    prop:value=move || view_state.with(|v| v.draft.clone())
                    on:input=move |ev| view_state.update(|v| v.draft = event_target_value(&ev))
                />
                <button
                    class="chat-page__send"
                    type="submit"
                    disabled=move || view_state.with(|v| v.sending || v.draft.trim().is_empty())
                >
                    "Send"
                </button>
            </form>
        </div>
    }
}

/// Fetch the chat, its messages and any participants not yet cached.
async fn load_chat(id: String, view_state: RwSignal<ChatViewState>, users: RwSignal<UsersCache>) {
    let loaded = async {
        let chat = crate::net::api::fetch_chat(&id).await?;
        let messages = crate::net::api::fetch_messages(&id).await?;
        Ok::<_, crate::net::api::ApiError>((chat, messages))
    }
    .await;

    match loaded {
        Ok((chat, messages)) => {
            let missing: Vec<String> = users.with_untracked(|u| {
                chat.participants
                    .iter()
                    .filter(|p| u.get(p).is_none())
                    .cloned()
                    .collect()
            });
            for user_id in missing {
                match crate::net::api::fetch_user(&user_id).await {
                    Ok(user) => users.update(|u| u.upsert(user)),
                    Err(e) => leptos::logging::warn!("participant {user_id} unavailable: {e}"),
                }
            }
            view_state.try_update(|v| v.set_loaded(chat, messages));
        }
        Err(e) => {
            view_state.try_update(|v| v.set_failed(&id, &e));
        }
    }
}
