//! Page visibility and window focus, read from the DOM.

use crate::state::read_tracking::{Focus, Visibility};

pub fn current_visibility() -> Visibility {
    #[cfg(feature = "hydrate")]
    {
        let hidden = web_sys::window()
            .and_then(|w| w.document())
            .is_some_and(|d| d.visibility_state() == web_sys::VisibilityState::Hidden);
        if hidden {
            return Visibility::Hidden;
        }
    }
    Visibility::Visible
}

pub fn current_focus() -> Focus {
    #[cfg(feature = "hydrate")]
    {
        let focused = web_sys::window()
            .and_then(|w| w.document())
            .map_or(true, |d| d.has_focus().unwrap_or(true));
        if !focused {
            return Focus::Unfocused;
        }
    }
    Focus::Focused
}

/// Full-page navigation, used after login/logout to reset all view state.
pub fn hard_navigate(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = path;
    }
}
