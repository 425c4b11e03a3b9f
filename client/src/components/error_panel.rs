//! Load-failure panel shared by the data-driven pages.

use leptos::prelude::*;

use crate::net::api::ErrorKind;
use crate::state::chat_view::ViewError;

/// Renders a [`ViewError`] according to its kind: session problems offer a
/// retry and a way back to login, missing resources only a way back, and
/// transient failures a retry.
#[component]
pub fn ErrorPanel(error: ViewError, on_retry: Callback<()>) -> impl IntoView {
    let (title, retry, login) = match error.kind {
        ErrorKind::Auth => ("Your session is not valid.", true, true),
        ErrorKind::NotFound => ("Nothing here.", false, false),
        ErrorKind::Transient => ("Something went wrong.", true, false),
    };

    view! {
        <div class="error-panel" role="alert">
            <p class="error-panel__title">{title}</p>
            <p class="error-panel__detail">{error.message}</p>
            <div class="error-panel__actions">
                <Show when=move || retry>
                    <button class="btn" on:click=move |_| on_retry.run(())>"Retry"</button>
                </Show>
                <Show when=move || login>
                    <a class="btn" href="/login">"Sign in"</a>
                </Show>
                <a class="btn btn--ghost" href="/">"Back to chats"</a>
            </div>
        </div>
    }
}
