//! Another user's public card, with a friend request action.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::error_panel::ErrorPanel;
use crate::components::nav_bar::NavBar;
use crate::state::auth::AuthState;
use crate::state::chat_view::ViewError;
use crate::state::users::UsersCache;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn UserPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let users = expect_context::<RwSignal<UsersCache>>();
    let params = use_params_map();
    let error = RwSignal::new(None::<ViewError>);
    let notice = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0_u32);

    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    let user_id = Memo::new(move |_| params.with(|p| p.get("id")).unwrap_or_default());

    Effect::new(move || {
        let _ = reload.get();
        let id = user_id.get();
        if id.is_empty() || auth.get().session.is_none() {
            return;
        }
        error.set(None);
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_user(&id).await {
                Ok(user) => users.update(|u| u.upsert(user)),
                Err(e) => {
                    error.try_set(Some(ViewError::from(&e)));
                }
            }
        });
    });

    let on_add = move |_| {
        let Some(viewer) = auth.get_untracked().viewer_id().map(str::to_owned) else {
            return;
        };
        let to_uid = user_id.get_untracked();
        leptos::task::spawn_local(async move {
            let text = match crate::net::api::send_friend_request(&viewer, &to_uid).await {
                Ok(()) => "Friend request sent.".to_owned(),
                Err(e) => format!("Request not sent: {e}"),
            };
            notice.try_set(Some(text));
        });
    };

    let on_retry = Callback::new(move |()| reload.update(|n| *n += 1));
    let shown = move || users.with(|u| u.get(&user_id.get()).cloned());
    let is_friend = move || {
        let viewer = auth.get().viewer_id().map(str::to_owned).unwrap_or_default();
        let id = user_id.get();
        viewer == id || users.with(|u| u.get(&viewer).is_some_and(|me| me.friends.contains_key(&id)))
    };

    view! {
        <div class="user-page">
            <NavBar title="User".to_owned()/>
            {move || error.get().map(|error| view! { <ErrorPanel error=error on_retry=on_retry/> })}
            {move || {
                shown().map(|user| {
                    view! {
                        <section class="profile-card">
                            <h1 class="profile-card__name">{user.username}</h1>
                            <p class="profile-card__email">{user.email}</p>
                            <p class="profile-card__status">{user.status}</p>
                        </section>
                    }
                })
            }}
            <Show when=move || !is_friend()>
                <button class="btn" on:click=on_add>"Add friend"</button>
            </Show>
            <Show when=move || notice.get().is_some()>
                <p class="user-page__notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
