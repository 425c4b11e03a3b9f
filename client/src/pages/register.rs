//! Account creation: create the user, verify the email, then sign in.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed email and username plus the password, or the first problem found.
fn validate_register_input(email: &str, username: &str, password: &str) -> Result<(String, String, String), &'static str> {
    let email = email.trim();
    let username = username.trim();
    if email.is_empty() || username.is_empty() {
        return Err("Fill in email and username.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Passwords need at least 6 characters.");
    }
    Ok((email.to_owned(), username.to_owned(), password.to_owned()))
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, username_value, password_value) =
            match validate_register_input(&email.get(), &username.get(), &password.get()) {
                Ok(fields) => fields,
                Err(msg) => {
                    info.set(msg.to_owned());
                    return;
                }
            };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match crate::net::api::register(&email_value, &password_value, &username_value).await {
                Ok(()) => navigate("/login", NavigateOptions::default()),
                Err(e) => {
                    info.set(format!("Registration failed: {e}"));
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Chat"</h1>
                <p class="login-card__subtitle">"Create an account"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a class="login-link" href="/login">"Back to sign in"</a>
            </div>
        </div>
    }
}
