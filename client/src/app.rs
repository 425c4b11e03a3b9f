//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{
    chat::ChatPage, friends::FriendsPage, home::HomePage, login::LoginPage, new_chat::NewChatPage,
    profile::ProfilePage, register::RegisterPage, user::UserPage,
};
use crate::state::{auth::AuthState, chat_view::ChatViewState, users::UsersCache};
use crate::util::session;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the shared state contexts and sets up client-side routing. The
/// open chat's state lives here rather than in the page so requests that
/// resolve after the page unmounts land on a torn-down state.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let users = RwSignal::new(UsersCache::default());
    let chat_view = RwSignal::new(ChatViewState::default());

    provide_context(auth);
    provide_context(users);
    provide_context(chat_view);

    // Effects only run in the browser, so SSR keeps `loading` and never
    // redirects.
    Effect::new(move || auth.set(AuthState::loaded(session::load())));

    view! {
        <Stylesheet id="leptos" href="/pkg/chat.css"/>
        <Title text="Chat"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=(StaticSegment("chat"), ParamSegment("id")) view=ChatPage/>
                <Route path=StaticSegment("new-chat") view=NewChatPage/>
                <Route path=StaticSegment("friends") view=FriendsPage/>
                <Route path=StaticSegment("profile") view=ProfilePage/>
                <Route path=(StaticSegment("user"), ParamSegment("id")) view=UserPage/>
            </Routes>
        </Router>
    }
}
