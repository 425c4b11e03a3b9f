//! The viewer's own account and sign-out.

use leptos::prelude::*;

use crate::components::error_panel::ErrorPanel;
use crate::components::nav_bar::NavBar;
use crate::state::auth::AuthState;
use crate::state::chat_view::ViewError;
use crate::state::users::UsersCache;
use crate::util::auth::install_unauth_redirect;
use crate::util::{browser, session};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let users = expect_context::<RwSignal<UsersCache>>();
    let error = RwSignal::new(None::<ViewError>);
    let reload = RwSignal::new(0_u32);
    let signing_out = RwSignal::new(false);

    install_unauth_redirect(auth, leptos_router::hooks::use_navigate());

    Effect::new(move || {
        let _ = reload.get();
        if auth.get().session.is_none() {
            return;
        }
        error.set(None);
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_current_user().await {
                Ok(user) => users.update(|u| u.upsert(user)),
                Err(e) => {
                    error.try_set(Some(ViewError::from(&e)));
                }
            }
        });
    });

    let on_logout = move |_| {
        let Some(current) = auth.get_untracked().session else {
            return;
        };
        signing_out.set(true);
        leptos::task::spawn_local(async move {
            if let Err(e) = crate::net::api::set_status(&current.user_id, "offline").await {
                leptos::logging::warn!("presence update failed: {e}");
            }
            if let Err(e) = crate::net::api::logout(&current.email).await {
                leptos::logging::warn!("logout call failed: {e}");
            }
            session::clear();
            browser::hard_navigate("/login");
        });
    };

    let on_retry = Callback::new(move |()| reload.update(|n| *n += 1));
    let me = move || {
        let id = auth.get().viewer_id().map(str::to_owned)?;
        users.with(|u| u.get(&id).cloned())
    };

    view! {
        <div class="profile-page">
            <NavBar title="Profile".to_owned()/>
            {move || error.get().map(|error| view! { <ErrorPanel error=error on_retry=on_retry/> })}
            {move || {
                me().map(|user| {
                    view! {
                        <section class="profile-card">
                            <div class="profile-card__avatar">
                                {user.avatar.map(|src| view! { <img src=src alt="avatar"/> })}
                            </div>
                            <h1 class="profile-card__name">{user.username}</h1>
                            <p class="profile-card__email">{user.email}</p>
                            <p class="profile-card__status">{user.status}</p>
                            <p class="profile-card__id">"Your id: " {user.id}</p>
                            <p class="profile-card__counts">
                                {format!("{} friends, {} chats", user.friends.len(), user.chat_user.len())}
                            </p>
                        </section>
                    }
                })
            }}
            <button class="btn btn--danger" on:click=on_logout disabled=move || signing_out.get()>
                "Sign out"
            </button>
        </div>
    }
}
