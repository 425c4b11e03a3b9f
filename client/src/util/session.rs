//! Persisted session identity.
//!
//! Only two values survive a reload: `currentUserId` and `currentUserEmail`
//! in `localStorage`. Everything else is rebuilt when a view mounts.
//!
//! TRADE-OFFS
//! ==========
//! Storage access is best-effort browser-only behavior; SSR paths see no
//! session and render the signed-out shell.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

#[cfg(any(test, feature = "hydrate"))]
const USER_ID_KEY: &str = "currentUserId";
#[cfg(any(test, feature = "hydrate"))]
const EMAIL_KEY: &str = "currentUserEmail";

/// Identity of the signed-in browser user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
}

/// Build a session from raw storage values; blank values mean signed out.
#[cfg(any(test, feature = "hydrate"))]
fn session_from_values(user_id: Option<String>, email: Option<String>) -> Option<Session> {
    let user_id = user_id.filter(|v| !v.trim().is_empty())?;
    Some(Session {
        user_id,
        email: email.unwrap_or_default(),
    })
}

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the persisted session, if any.
pub fn load() -> Option<Session> {
    #[cfg(feature = "hydrate")]
    {
        let storage = storage()?;
        session_from_values(
            storage.get_item(USER_ID_KEY).ok().flatten(),
            storage.get_item(EMAIL_KEY).ok().flatten(),
        )
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn current_user_id() -> Option<String> {
    load().map(|s| s.user_id)
}

/// Persist a freshly signed-in session.
pub fn store(session: &Session) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = storage() {
            let _ = storage.set_item(USER_ID_KEY, &session.user_id);
            let _ = storage.set_item(EMAIL_KEY, &session.email);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = session;
    }
}

/// Forget the session on logout.
pub fn clear() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(USER_ID_KEY);
            let _ = storage.remove_item(EMAIL_KEY);
        }
    }
}
