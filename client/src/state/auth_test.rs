use super::*;

#[test]
fn default_state_is_loading_without_session() {
    let state = AuthState::default();
    assert!(state.loading);
    assert_eq!(state.viewer_id(), None);
}

#[test]
fn loaded_session_exposes_viewer_id() {
    let state = AuthState::loaded(Some(Session {
        user_id: "u1".to_owned(),
        email: "marco@example.com".to_owned(),
    }));
    assert!(!state.loading);
    assert_eq!(state.viewer_id(), Some("u1"));
}
