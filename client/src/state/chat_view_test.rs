use super::*;
use wire::model::{MessagePatch, User};

fn msg(id: &str, sender: &str, ts: &str) -> Message {
    Message {
        id: id.to_owned(),
        chat_id: "c1".to_owned(),
        sender: sender.to_owned(),
        content: format!("text {id}"),
        timestamp: Some(ts.to_owned()),
        read: false,
    }
}

fn chat() -> Chat {
    Chat {
        id: "c1".to_owned(),
        participants: vec!["me".to_owned(), "luigi".to_owned()],
        ..Chat::default()
    }
}

fn batch(chat_id: &str, records: Vec<MessagePatch>) -> MessagesBatch {
    MessagesBatch {
        chat_id: chat_id.to_owned(),
        messages: records,
    }
}

#[test]
fn loaded_messages_are_sorted() {
    let mut state = ChatViewState::open("c1");
    state.set_loaded(
        chat(),
        vec![msg("b", "me", "2024-05-01T10:01:00Z"), msg("a", "luigi", "2024-05-01T10:00:00Z")],
    );
    assert!(!state.loading);
    let ids: Vec<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn batch_for_open_chat_replaces_messages() {
    let mut state = ChatViewState::open("c1");
    state.set_loaded(chat(), vec![msg("a", "luigi", "2024-05-01T10:00:00Z")]);

    let mut update = MessagePatch::from(msg("a", "luigi", "2024-05-01T10:00:00Z"));
    update.timestamp = None;
    update.read = Some(true);
    let fresh = MessagePatch::from(msg("b", "me", "2024-05-01T10:05:00Z"));

    assert!(state.apply_batch(&batch("c1", vec![update, fresh])));
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages[0].read);
    assert_eq!(state.messages[0].timestamp.as_deref(), Some("2024-05-01T10:00:00Z"));
}

#[test]
fn batch_for_other_chat_is_ignored() {
    let mut state = ChatViewState::open("c1");
    state.set_loaded(chat(), vec![msg("a", "luigi", "2024-05-01T10:00:00Z")]);
    let foreign = MessagePatch::from(msg("z", "x", "2024-05-01T11:00:00Z"));
    assert!(!state.apply_batch(&batch("c2", vec![foreign])));
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn teardown_makes_late_results_no_ops() {
    let mut state = ChatViewState::open("c1");
    state.teardown();

    state.set_loaded(chat(), vec![msg("a", "luigi", "2024-05-01T10:00:00Z")]);
    assert!(state.messages.is_empty());
    assert!(state.chat.is_none());

    let late = MessagePatch::from(msg("b", "luigi", "2024-05-01T10:00:00Z"));
    assert!(!state.apply_batch(&batch("c1", vec![late])));
    assert!(state.messages.is_empty());

    state.set_failed("c1", &ApiError::Network("gone".to_owned()));
    assert!(state.error.is_none());
}

#[test]
fn results_for_a_previous_chat_are_ignored() {
    let mut state = ChatViewState::open("c2");
    state.set_loaded(chat(), vec![msg("a", "luigi", "2024-05-01T10:00:00Z")]);
    assert!(state.chat.is_none());
    assert!(state.loading);

    state.set_failed("c1", &ApiError::Network("late".to_owned()));
    assert!(state.error.is_none());
}

#[test]
fn sent_message_shows_before_realtime_echo() {
    let mut state = ChatViewState::open("c1");
    state.set_loaded(chat(), vec![msg("a", "luigi", "2024-05-01T10:00:00Z")]);
    state.record_sent(msg("b", "me", "2024-05-01T10:03:00Z"));
    state.record_sent(msg("b", "me", "2024-05-01T10:03:00Z"));
    let ids: Vec<&str> = state.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn failures_carry_their_kind() {
    let mut state = ChatViewState::open("c1");
    state.set_failed("c1", &ApiError::NotFound("chat".to_owned()));
    let err = state.error.expect("error");
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(!state.loading);
}

#[test]
fn only_own_messages_can_be_edited() {
    let mut state = ChatViewState::open("c1");
    state.set_loaded(
        chat(),
        vec![msg("a", "luigi", "2024-05-01T10:00:00Z"), msg("b", "me", "2024-05-01T10:01:00Z")],
    );
    assert!(!state.begin_edit("a", "me"));
    assert!(state.begin_edit("b", "me"));
    assert_eq!(
        state.editing,
        Some(EditDraft {
            message_id: "b".to_owned(),
            content: "text b".to_owned()
        })
    );
}

#[test]
fn menu_toggles_per_message() {
    let mut state = ChatViewState::default();
    state.toggle_menu("a");
    assert_eq!(state.menu_for.as_deref(), Some("a"));
    state.toggle_menu("b");
    assert_eq!(state.menu_for.as_deref(), Some("b"));
    state.toggle_menu("b");
    assert_eq!(state.menu_for, None);
}

#[test]
fn title_uses_other_participant_name() {
    let mut users = UsersCache::default();
    users.upsert(User {
        id: "luigi".to_owned(),
        username: "Luigi Bianchi".to_owned(),
        ..User::default()
    });
    assert_eq!(chat_title(&chat(), "me", &users), "Luigi Bianchi");

    let group = Chat {
        kind: ChatKind::Group,
        name: Some("Team".to_owned()),
        ..chat()
    };
    assert_eq!(chat_title(&group, "me", &users), "Team");
}

#[test]
fn delivery_mark_only_on_own_messages() {
    let mut own = msg("a", "me", "2024-05-01T10:00:00Z");
    assert_eq!(delivery_mark(&own, "me"), Some("✓"));
    own.read = true;
    assert_eq!(delivery_mark(&own, "me"), Some("✓✓"));
    assert_eq!(delivery_mark(&own, "luigi"), None);
}

#[test]
fn empty_batch_for_open_chat_clears_messages() {
    let mut state = ChatViewState::open("c1");
    state.set_loaded(chat(), vec![msg("m1", "luigi", "2024-05-01T10:00:00Z")]);

    assert!(state.apply_batch(&batch("c1", Vec::new())));
    assert!(state.messages.is_empty());
}
