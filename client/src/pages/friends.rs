//! Friends list, incoming requests, and sending a request by user id.

use leptos::prelude::*;

use crate::components::error_panel::ErrorPanel;
use crate::components::nav_bar::NavBar;
use crate::state::auth::AuthState;
use crate::state::chat_view::ViewError;
use crate::state::friends::FriendsState;
use crate::util::auth::install_unauth_redirect;

#[cfg(test)]
#[path = "friends_test.rs"]
mod friends_test;

/// Trimmed target id; the viewer cannot befriend themselves.
fn validate_friend_target(input: &str, viewer_id: &str) -> Result<String, &'static str> {
    let target = input.trim();
    if target.is_empty() || target == viewer_id {
        return Err("Enter another user's id.");
    }
    Ok(target.to_owned())
}

#[component]
pub fn FriendsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let state = RwSignal::new(FriendsState {
        loading: true,
        ..FriendsState::default()
    });
    let reload = RwSignal::new(0_u32);
    let target = RwSignal::new(String::new());

    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    Effect::new(move || {
        let _ = reload.get();
        let Some(viewer) = auth.get().viewer_id().map(str::to_owned) else {
            return;
        };
        state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        leptos::task::spawn_local(async move {
            let loaded = async {
                let friends = crate::net::api::fetch_friends(&viewer).await?;
                let requests = crate::net::api::fetch_friend_requests(&viewer).await?;
                Ok::<_, crate::net::api::ApiError>((friends, requests))
            }
            .await;
            state.try_update(|s| {
                s.loading = false;
                match loaded {
                    Ok((friends, requests)) => {
                        s.friends = friends;
                        s.requests = requests;
                    }
                    Err(e) => s.error = Some(ViewError::from(&e)),
                }
            });
        });
    });

    let respond = move |from_uid: String, accept: bool| {
        let Some(viewer) = auth.get_untracked().viewer_id().map(str::to_owned) else {
            return;
        };
        leptos::task::spawn_local(async move {
            let result = if accept {
                crate::net::api::accept_friend_request(&from_uid, &viewer).await
            } else {
                crate::net::api::reject_friend_request(&from_uid, &viewer).await
            };
            match result {
                Ok(()) => {
                    state.try_update(|s| {
                        s.resolve_request(&from_uid);
                        s.notice = Some(if accept { "Request accepted." } else { "Request declined." }.to_owned());
                    });
                    if accept {
                        reload.try_update(|n| *n += 1);
                    }
                }
                Err(e) => {
                    state.try_update(|s| s.notice = Some(format!("Could not answer the request: {e}")));
                }
            }
        });
    };

    let on_send = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(viewer) = auth.get_untracked().viewer_id().map(str::to_owned) else {
            return;
        };
        let to_uid = match validate_friend_target(&target.get_untracked(), &viewer) {
            Ok(id) => id,
            Err(msg) => {
                state.update(|s| s.notice = Some(msg.to_owned()));
                return;
            }
        };
        leptos::task::spawn_local(async move {
            let notice = match crate::net::api::send_friend_request(&viewer, &to_uid).await {
                Ok(()) => {
                    target.try_set(String::new());
                    "Request sent.".to_owned()
                }
                Err(e) => format!("Request not sent: {e}"),
            };
            state.try_update(|s| s.notice = Some(notice));
        });
    };

    let on_retry = Callback::new(move |()| reload.update(|n| *n += 1));

    view! {
        <div class="friends-page">
            <NavBar title="Friends".to_owned()/>
            {move || state.get().error.map(|error| view! { <ErrorPanel error=error on_retry=on_retry/> })}
            <Show when=move || state.with(|s| s.notice.is_some())>
                <p class="friends-page__notice">{move || state.with(|s| s.notice.clone().unwrap_or_default())}</p>
            </Show>
            <form class="friends-page__add" on:submit=on_send>
                <input
                    type="text"
                    placeholder="User id"
                    prop:value=move || target.get()
                    on:input=move |ev| target.set(event_target_value(&ev))
                />
                <button class="btn" type="submit">"Add friend"</button>
            </form>
            <h2>"Requests"</h2>
            <ul class="friends-page__requests">
                {move || {
                    state
                        .get()
                        .requests
                        .into_iter()
                        .map(|request| {
                            let accept_id = request.id.clone();
                            let reject_id = request.id.clone();
                            view! {
                                <li class="friend-row">
                                    <span class="friend-row__name">{request.username}</span>
                                    <button class="btn" on:click=move |_| respond(accept_id.clone(), true)>
                                        "Accept"
                                    </button>
                                    <button class="btn btn--ghost" on:click=move |_| respond(reject_id.clone(), false)>
                                        "Decline"
                                    </button>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <h2>"Friends"</h2>
            <Show
                when=move || !state.with(|s| s.loading)
                fallback=move || view! { <p class="friends-page__loading">"Loading friends..."</p> }
            >
                <ul class="friends-page__list">
                    {move || {
                        state
                            .get()
                            .friends
                            .into_iter()
                            .map(|friend| {
                                let href = format!("/user/{}", friend.id);
                                view! {
                                    <li class="friend-row">
                                        <a class="friend-row__name" href=href>{friend.username}</a>
                                        <span class="friend-row__email">{friend.email}</span>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}
