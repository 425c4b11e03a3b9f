use super::*;
use std::sync::Mutex;

fn delivery(syscall: &str, chat_id: Option<&str>, data: serde_json::Value) -> Frame {
    Frame {
        id: "f1".to_owned(),
        parent_id: None,
        ts: 0,
        chat_id: chat_id.map(str::to_owned),
        from: Some("server".to_owned()),
        syscall: syscall.to_owned(),
        status: Status::Item,
        data,
    }
}

const BOTH: ChannelConfig = ChannelConfig { users: true, messages: true };

#[test]
fn config_lists_only_requested_topics() {
    assert_eq!(BOTH.topics(), vec![Topic::Users, Topic::Chats]);
    assert_eq!(ChannelConfig { users: false, messages: true }.topics(), vec![Topic::Chats]);
    assert!(ChannelConfig::default().topics().is_empty());
}

#[test]
fn subscribe_frame_names_topics() {
    let frame = subscribe_frame(ChannelConfig { users: true, messages: false }, 5);
    assert_eq!(frame.syscall, "channel:subscribe");
    assert_eq!(frame.status, Status::Request);
    assert_eq!(frame.data, serde_json::json!({"topics": ["users"]}));
}

#[test]
fn users_snapshot_parses() {
    let frame = delivery(
        "users:snapshot",
        None,
        serde_json::json!({"users": {"u1": {"id": "u1", "username": "marco"}}}),
    );
    let Some(ChannelEvent::Users(users)) = parse_frame(&frame, BOTH).expect("parse") else {
        panic!("expected users event");
    };
    assert_eq!(users["u1"].username, "marco");
}

#[test]
fn message_records_inherit_batch_chat_id() {
    let frame = delivery(
        "chats:messages",
        Some("c1"),
        serde_json::json!({"messages": [{"id": "m1", "timestamp": null}]}),
    );
    let Some(ChannelEvent::Messages(batch)) = parse_frame(&frame, BOTH).expect("parse") else {
        panic!("expected messages event");
    };
    assert_eq!(batch.chat_id, "c1");
    assert_eq!(batch.messages[0].chat_id.as_deref(), Some("c1"));
}

#[test]
fn unsubscribed_topics_and_other_syscalls_are_skipped() {
    let users = delivery("users:snapshot", None, serde_json::json!({"users": {}}));
    let only_messages = ChannelConfig { users: false, messages: true };
    assert_eq!(parse_frame(&users, only_messages).expect("parse"), None);

    let hello = delivery("session:connected", None, serde_json::json!({}));
    assert_eq!(parse_frame(&hello, BOTH).expect("parse"), None);
}

#[test]
fn malformed_payload_is_an_error() {
    let frame = delivery("chats:messages", None, serde_json::json!({"messages": "nope"}));
    assert!(parse_frame(&frame, BOTH).is_err());
}

#[test]
fn url_follows_page_scheme() {
    assert_eq!(channel_url("https:", "chat.example"), "wss://chat.example/api/ws");
    assert_eq!(channel_url("http:", "localhost:8080"), "ws://localhost:8080/api/ws");
}

#[test]
fn backoff_doubles_up_to_cap() {
    assert_eq!(next_backoff(INITIAL_BACKOFF_MS), 2000);
    assert_eq!(next_backoff(8000), MAX_BACKOFF_MS);
    assert_eq!(next_backoff(MAX_BACKOFF_MS), MAX_BACKOFF_MS);
}

#[test]
fn delivery_stops_after_deactivate() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let channel = open(BOTH, move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(event);
        }
    });
    let frame = delivery("chats:messages", Some("c1"), serde_json::json!({"chatId": "c1", "messages": []}));

    channel.deliver(&frame);
    assert!(seen.lock().expect("lock").is_empty(), "inactive channel delivered");

    channel.activate();
    channel.deliver(&frame);
    assert_eq!(seen.lock().expect("lock").len(), 1);

    channel.deactivate();
    channel.deactivate();
    assert!(!channel.is_active());
    channel.deliver(&frame);
    assert_eq!(seen.lock().expect("lock").len(), 1);
}
