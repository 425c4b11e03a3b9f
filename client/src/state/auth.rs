//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware pages to coordinate login redirects
//! and identity-dependent rendering.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::util::session::Session;

/// Authentication state: the persisted session, once loaded.
///
/// `loading` stays true until the session has been read from storage after
/// hydration, so guards never redirect during server rendering.
#[derive(Clone, Debug)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { session: None, loading: true }
    }
}

impl AuthState {
    pub fn loaded(session: Option<Session>) -> Self {
        Self { session, loading: false }
    }

    pub fn viewer_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }
}
