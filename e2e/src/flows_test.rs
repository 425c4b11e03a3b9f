//! Live flows. Start the server, then run with `--ignored`.

use std::time::Duration;

use client::state::chat_view::delivery_mark;
use client::state::chats::{ReadBadge, read_badge, summaries_for};
use client::state::messages::merge_batch;
use client::state::read_tracking::{Focus, ReadContext, Visibility, should_mark_read};
use reqwest::StatusCode;

use super::*;

const DELIVERY_DEADLINE: Duration = Duration::from_secs(5);

/// Flows share one seeded chat; run them one at a time.
static FLOW_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn unique(label: &str) -> String {
    format!("{label} {}", uuid::Uuid::new_v4())
}

fn unread_in(users: &BTreeMap<String, User>, user_id: &str, chat_id: &str) -> Option<u32> {
    users.get(user_id)?.chat_user.get(chat_id).map(|e| e.unread_count)
}

#[tokio::test]
#[ignore = "live e2e test; run against a server with --ignored"]
async fn login_flow() -> Result<(), E2eError> {
    init_tracing();
    let _serial = FLOW_LOCK.lock().await;
    let cfg = E2eConfig::from_env();

    let session = ApiSession::login(&cfg.base_url, &cfg.sender).await?;
    let me = session.user(&session.user_id).await?;
    assert_eq!(me.email, cfg.sender.email);

    let wrong = Account { email: cfg.sender.email.clone(), password: "not-the-password".to_owned() };
    match ApiSession::login(&cfg.base_url, &wrong).await {
        Err(E2eError::Http(e)) => assert_eq!(e.status(), Some(StatusCode::UNAUTHORIZED)),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("login with a wrong password succeeded"),
    }
    Ok(())
}

#[tokio::test]
#[ignore = "live e2e test; run against a server with --ignored"]
async fn send_message_flow() -> Result<(), E2eError> {
    init_tracing();
    let _serial = FLOW_LOCK.lock().await;
    let cfg = E2eConfig::from_env();
    let sender = ApiSession::login(&cfg.base_url, &cfg.sender).await?;
    let receiver = ApiSession::login(&cfg.base_url, &cfg.receiver).await?;

    let content = unique("hello from e2e");
    let sent = sender.send(&cfg.chat_id, &content).await?;
    assert_eq!(sent.sender, sender.user_id);
    assert!(!sent.read);
    assert!(sent.timestamp.is_some());

    let listed = receiver.messages(&cfg.chat_id).await?;
    assert_eq!(listed.last().map(|m| m.id.as_str()), Some(sent.id.as_str()));

    let viewer = receiver.user(&receiver.user_id).await?;
    let summary = summaries_for(&viewer)
        .into_iter()
        .find(|s| s.chat_id == cfg.chat_id)
        .expect("chat summary for receiver");
    assert_eq!(summary.last_message, content);
    assert!(matches!(read_badge(&summary, &receiver.user_id), ReadBadge::Unread(_)));
    Ok(())
}

#[tokio::test]
#[ignore = "live e2e test; run against a server with --ignored"]
async fn read_status_flow() -> Result<(), E2eError> {
    init_tracing();
    let _serial = FLOW_LOCK.lock().await;
    let cfg = E2eConfig::from_env();
    let sender = ApiSession::login(&cfg.base_url, &cfg.sender).await?;
    let receiver = ApiSession::login(&cfg.base_url, &cfg.receiver).await?;

    let sent = sender.send(&cfg.chat_id, &unique("read me")).await?;
    let mark_of = |messages: &[Message]| {
        messages
            .iter()
            .find(|m| m.id == sent.id)
            .and_then(|m| delivery_mark(m, &sender.user_id))
    };

    assert_eq!(mark_of(&sender.messages(&cfg.chat_id).await?), Some("✓"));
    receiver.mark_read(&cfg.chat_id).await?;
    assert_eq!(mark_of(&sender.messages(&cfg.chat_id).await?), Some("✓✓"));
    Ok(())
}

#[tokio::test]
#[ignore = "live e2e test; run against a server with --ignored"]
async fn realtime_delivery_flow() -> Result<(), E2eError> {
    init_tracing();
    let _serial = FLOW_LOCK.lock().await;
    let cfg = E2eConfig::from_env();
    let sender = ApiSession::login(&cfg.base_url, &cfg.sender).await?;
    let receiver = ApiSession::login(&cfg.base_url, &cfg.receiver).await?;

    let mut receiver_channel = ChannelSession::connect(&cfg.base_url).await?;
    receiver_channel.subscribe(&[Topic::Chats]).await?;
    let shown = receiver.messages(&cfg.chat_id).await?;

    let content = unique("realtime");
    let sent = sender.send(&cfg.chat_id, &content).await?;

    let batch = receiver_channel.next_batch(&cfg.chat_id, DELIVERY_DEADLINE).await?;
    let merged = merge_batch(&shown, &batch.messages, &cfg.chat_id).unwrap_or(shown);
    let last = merged.last().expect("merged list is not empty");
    assert_eq!(last.id, sent.id);
    assert_eq!(last.content, content);

    let ctx = ReadContext {
        messages: &merged,
        viewer_id: Some(receiver.user_id.as_str()),
        chat_id: Some(cfg.chat_id.as_str()),
        visibility: Visibility::Visible,
        focus: Focus::Focused,
    };
    assert!(should_mark_read(&ctx));

    let mut sender_channel = ChannelSession::connect(&cfg.base_url).await?;
    sender_channel.subscribe(&[Topic::Users]).await?;
    sender_channel
        .users_until(DELIVERY_DEADLINE, |users| {
            unread_in(users, &sender.user_id, &cfg.chat_id).is_some_and(|n| n > 0)
        })
        .await?;

    receiver.mark_read(&cfg.chat_id).await?;

    let users = sender_channel
        .users_until(DELIVERY_DEADLINE, |users| {
            unread_in(users, &sender.user_id, &cfg.chat_id) == Some(0)
        })
        .await?;
    let me = users.get(&sender.user_id).expect("sender in snapshot");
    let summary = summaries_for(me)
        .into_iter()
        .find(|s| s.chat_id == cfg.chat_id)
        .expect("chat summary for sender");
    assert_eq!(read_badge(&summary, &sender.user_id), ReadBadge::Seen);
    Ok(())
}
