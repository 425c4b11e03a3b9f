//! Home page: the viewer's chat list, live.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. It fetches the viewer's record
//! once, then subscribes to `users` so every realtime snapshot rebuilds the
//! list wholesale from the viewer's `chatUser` summaries.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::chat_row::ChatRow;
use crate::components::error_panel::ErrorPanel;
use crate::components::nav_bar::NavBar;
use crate::net::channel::{self, ChannelConfig, ChannelEvent};
use crate::state::auth::AuthState;
use crate::state::chat_view::ViewError;
use crate::state::chats::ChatSummary;
use crate::state::home::HomeState;
use crate::state::read_tracking::should_mark_on_open;
use crate::state::users::UsersCache;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let users = expect_context::<RwSignal<UsersCache>>();
    let home = RwSignal::new(HomeState {
        loading: true,
        ..HomeState::default()
    });
    let navigate = use_navigate();
    let reload = RwSignal::new(0_u32);

    install_unauth_redirect(auth, navigate.clone());

    // Initial fetch of the viewer's record; re-runs on retry.
    Effect::new(move || {
        let _ = reload.get();
        let state = auth.get();
        if state.session.is_none() {
            return;
        }
        home.update(|h| h.loading = true);
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_current_user().await {
                Ok(user) => {
                    home.try_update(|h| h.refresh_from_user(&user));
                    users.update(|u| u.upsert(user));
                }
                Err(e) => {
                    home.try_update(|h| {
                        h.loading = false;
                        h.error = Some(ViewError::from(&e));
                    });
                }
            }
        });
    });

    let realtime = channel::open(ChannelConfig { users: true, messages: false }, move |event| {
        let ChannelEvent::Users(snapshot) = event else {
            return;
        };
        let viewer = auth
            .get_untracked()
            .viewer_id()
            .and_then(|id| snapshot.get(id).cloned());
        if let Some(viewer) = viewer {
            home.try_update(|h| h.refresh_from_user(&viewer));
        }
        users.update(|u| u.replace_all(snapshot));
    });
    realtime.activate();
    on_cleanup({
        let realtime = realtime.clone();
        move || realtime.deactivate()
    });

    let on_open = Callback::new(move |summary: ChatSummary| {
        let Some(viewer_id) = auth.get_untracked().viewer_id().map(str::to_owned) else {
            return;
        };
        if should_mark_on_open(&summary, &viewer_id) {
            let chat_id = summary.chat_id.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = crate::net::api::mark_chat_read(&chat_id).await {
                    leptos::logging::warn!("mark read on open failed: {e}");
                }
            });
        }
        navigate(&format!("/chat/{}", summary.chat_id), NavigateOptions::default());
    });

    let on_retry = Callback::new(move |()| reload.update(|n| *n += 1));
    let viewer_id = move || auth.get().viewer_id().map(str::to_owned).unwrap_or_default();
    let unread = Signal::derive(move || {
        let viewer = viewer_id();
        home.with(|h| h.total_unread(&viewer))
    });

    view! {
        <div class="home-page">
            <NavBar title="Chats".to_owned() unread=unread/>
            <input
                class="home-page__search"
                type="search"
                placeholder="Search chats"
                prop:value=move || home.get().query
                on:input=move |ev| home.update(|h| h.query = event_target_value(&ev))
            />
            {move || {
                home.get()
                    .error
                    .map(|error| view! { <ErrorPanel error=error on_retry=on_retry/> })
            }}
            <Show
                when=move || !home.get().loading
                fallback=move || view! { <p class="home-page__loading">"Loading chats..."</p> }
            >
                <Show
                    when=move || !home.get().summaries.is_empty()
                    fallback=move || {
                        view! {
                            <p class="home-page__empty">
                                "No chats yet. " <a href="/new-chat">"Start one"</a>
                            </p>
                        }
                    }
                >
                    <ul class="chat-list">
                        {move || {
                            let viewer = viewer_id();
                            home.get()
                                .visible()
                                .into_iter()
                                .map(|summary| {
                                    view! {
                                        <ChatRow summary=summary viewer_id=viewer.clone() on_open=on_open/>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </Show>
            </Show>
        </div>
    }
}
