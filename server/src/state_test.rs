use super::*;
use tokio::time::{Duration, timeout};

async fn next(rx: &mut broadcast::Receiver<Frame>) -> Frame {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("hub receive timed out")
        .expect("hub closed")
}

#[tokio::test]
async fn publish_users_sends_full_snapshot() {
    let state = test_helpers::test_app_state();
    let mut rx = state.hub.subscribe();

    state.publish(&[Change::Users]).await;

    let frame = next(&mut rx).await;
    assert_eq!(frame.syscall, "users:snapshot");
    assert_eq!(frame.status, Status::Item);
    let snapshot: UsersSnapshot = serde_json::from_value(frame.data).expect("snapshot payload");
    assert_eq!(snapshot.users.len(), 3);
}

#[tokio::test]
async fn publish_chat_sends_ordered_batch_with_chat_ids() {
    let state = test_helpers::test_app_state();
    let mut rx = state.hub.subscribe();

    state.publish(&[Change::Chat("c-marco-luigi".to_owned())]).await;

    let frame = next(&mut rx).await;
    assert_eq!(frame.syscall, "chats:messages");
    assert_eq!(frame.chat_id.as_deref(), Some("c-marco-luigi"));
    let batch: MessagesBatch = serde_json::from_value(frame.data).expect("batch payload");
    let ids: Vec<&str> = batch.messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m-001", "m-002"]);
    assert!(batch.messages.iter().all(|m| m.chat_id.as_deref() == Some("c-marco-luigi")));
}

#[tokio::test]
async fn unknown_chat_publishes_nothing() {
    let state = test_helpers::test_app_state();
    let mut rx = state.hub.subscribe();

    state.publish(&[Change::Chat("gone".to_owned()), Change::Users]).await;

    assert_eq!(next(&mut rx).await.syscall, "users:snapshot");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn publish_without_subscribers_is_harmless() {
    let state = test_helpers::test_app_state();
    state.publish(&[Change::Users]).await;
}
