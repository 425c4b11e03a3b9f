//! New chat: pick an active friend, write a first message.
//!
//! Submitting opens the existing individual chat with that friend when there
//! is one; otherwise the backend creates it with the message. Either way the
//! page navigates into the chat.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::error_panel::ErrorPanel;
use crate::components::nav_bar::NavBar;
use crate::state::auth::AuthState;
use crate::state::chat_view::ViewError;
use crate::state::friends::{NewChatForm, active_friends};
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn NewChatPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let navigate = use_navigate();
    let friends = RwSignal::new(Vec::new());
    let load_error = RwSignal::new(None::<ViewError>);
    let form = RwSignal::new(NewChatForm::default());
    let reload = RwSignal::new(0_u32);

    install_unauth_redirect(auth, navigate.clone());

    Effect::new(move || {
        let _ = reload.get();
        let Some(viewer) = auth.get().viewer_id().map(str::to_owned) else {
            return;
        };
        load_error.set(None);
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_friends(&viewer).await {
                Ok(list) => {
                    friends.try_set(list);
                }
                Err(e) => {
                    load_error.try_set(Some(ViewError::from(&e)));
                }
            }
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(viewer) = auth.get_untracked().viewer_id().map(str::to_owned) else {
            return;
        };
        let current = form.get_untracked();
        if current.submitting {
            return;
        }
        let (friend_id, message) = match current.validate() {
            Ok(fields) => fields,
            Err(invalid) => {
                form.update(|f| f.error = Some(invalid.message().to_owned()));
                return;
            }
        };
        form.update(|f| {
            f.submitting = true;
            f.error = None;
        });
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::create_individual_chat_if_absent(&viewer, &friend_id, &message).await {
                Ok(outcome) => {
                    if outcome.already_exists {
                        leptos::logging::log!("reusing chat {} with {friend_id}", outcome.chat_id);
                    }
                    navigate(&format!("/chat/{}", outcome.chat_id), NavigateOptions::default());
                }
                Err(e) => {
                    form.try_update(|f| {
                        f.submitting = false;
                        f.error = Some(format!("Could not start the chat: {e}"));
                    });
                }
            }
        });
    };

    let on_retry = Callback::new(move |()| reload.update(|n| *n += 1));

    view! {
        <div class="new-chat-page">
            <NavBar title="New chat".to_owned()/>
            {move || load_error.get().map(|error| view! { <ErrorPanel error=error on_retry=on_retry/> })}
            <form class="new-chat-form" on:submit=on_submit>
                <select
                    class="new-chat-form__friend"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| f.friend_id = Some(value).filter(|v| !v.is_empty()));
                    }
                >
                    <option value="">"Choose a friend"</option>
                    {move || {
                        friends
                            .with(|list| {
                                active_friends(list)
                                    .into_iter()
                                    .map(|f| (f.id.clone(), f.username.clone()))
                                    .collect::<Vec<_>>()
                            })
                            .into_iter()
                            .map(|(id, name)| view! { <option value=id>{name}</option> })
                            .collect_view()
                    }}
                </select>
                <textarea
                    class="new-chat-form__message"
                    placeholder="Say hello"
                    prop:value=move || form.with(|f| f.message.clone())
                    on:input=move |ev| form.update(|f| f.message = event_target_value(&ev))
                ></textarea>
                <button class="btn" type="submit" disabled=move || form.with(|f| f.submitting)>
                    "Start chat"
                </button>
                <Show when=move || form.with(|f| f.error.is_some())>
                    <p class="new-chat-form__error">
                        {move || form.with(|f| f.error.clone().unwrap_or_default())}
                    </p>
                </Show>
            </form>
        </div>
    }
}
