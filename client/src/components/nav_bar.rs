//! Top navigation shared by the authenticated pages.

use leptos::prelude::*;

#[component]
pub fn NavBar(title: String, #[prop(optional)] unread: Option<Signal<u32>>) -> impl IntoView {
    view! {
        <header class="nav-bar">
            <a class="nav-bar__home" href="/">"←"</a>
            <span class="nav-bar__title">{title}</span>
            {unread.map(|count| {
                view! {
                    <Show when=move || { count.get() > 0 }>
                        <span class="nav-bar__unread">{move || count.get()}</span>
                    </Show>
                }
            })}
            <span class="nav-bar__spacer"></span>
            <a class="nav-bar__link" href="/new-chat">"New chat"</a>
            <a class="nav-bar__link" href="/friends">"Friends"</a>
            <a class="nav-bar__link" href="/profile">"Profile"</a>
        </header>
    }
}
