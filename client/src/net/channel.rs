//! Realtime pub/sub channel over the backend websocket.
//!
//! A [`RealtimeChannel`] is owned by one view. The view opens it with an
//! explicit [`ChannelConfig`] naming the topics it wants, calls
//! [`RealtimeChannel::activate`] on mount and
//! [`RealtimeChannel::deactivate`] on unmount. While active, the channel
//! reconnects with exponential backoff and re-sends its subscription after
//! every connect.
//!
//! All websocket logic is gated behind `#[cfg(feature = "hydrate")]`; frame
//! parsing is pure and shared with tests.
//!
//! ERROR HANDLING
//! ==============
//! Undecodable frames and payloads are logged and skipped. Transport errors
//! end the current connection and fall into the reconnect loop.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wire::model::{MessagesBatch, Subscribe, User, UsersSnapshot};
use wire::{Frame, Status, Topic, topic};

#[cfg(any(test, feature = "hydrate"))]
const INITIAL_BACKOFF_MS: u32 = 1000;
#[cfg(any(test, feature = "hydrate"))]
const MAX_BACKOFF_MS: u32 = 10_000;

/// Topics a channel subscribes to. No topic is implied by a handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelConfig {
    pub users: bool,
    pub messages: bool,
}

impl ChannelConfig {
    pub fn topics(self) -> Vec<Topic> {
        let mut topics = Vec::new();
        if self.users {
            topics.push(Topic::Users);
        }
        if self.messages {
            topics.push(Topic::Chats);
        }
        topics
    }

    pub fn accepts(self, topic: Topic) -> bool {
        match topic {
            Topic::Users => self.users,
            Topic::Chats => self.messages,
        }
    }
}

/// A decoded delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Users(BTreeMap<String, User>),
    Messages(MessagesBatch),
}

/// Decode a frame into an event the config asked for.
///
/// Returns `Ok(None)` for frames that are not topic deliveries or belong to a
/// topic outside `config`. Message records without their own `chatId` inherit
/// the batch's.
///
/// # Errors
///
/// Returns the payload decode error for malformed deliveries.
pub fn parse_frame(frame: &Frame, config: ChannelConfig) -> Result<Option<ChannelEvent>, serde_json::Error> {
    let Some(topic) = Topic::of_syscall(&frame.syscall) else {
        return Ok(None);
    };
    if !config.accepts(topic) {
        return Ok(None);
    }
    match topic {
        Topic::Users => {
            let snapshot: UsersSnapshot = serde_json::from_value(frame.data.clone())?;
            Ok(Some(ChannelEvent::Users(snapshot.users)))
        }
        Topic::Chats => {
            let mut batch: MessagesBatch = serde_json::from_value(frame.data.clone())?;
            if batch.chat_id.is_empty() {
                batch.chat_id = frame.chat_id.clone().unwrap_or_default();
            }
            for record in &mut batch.messages {
                record.chat_id.get_or_insert_with(|| batch.chat_id.clone());
            }
            Ok(Some(ChannelEvent::Messages(batch)))
        }
    }
}

/// The `channel:subscribe` request for `config`.
pub fn subscribe_frame(config: ChannelConfig, now_ms: i64) -> Frame {
    Frame {
        id: uuid::Uuid::new_v4().to_string(),
        parent_id: None,
        ts: now_ms,
        chat_id: None,
        from: None,
        syscall: topic::CHANNEL_SUBSCRIBE.to_owned(),
        status: Status::Request,
        data: serde_json::to_value(Subscribe { topics: config.topics() }).unwrap_or_default(),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn channel_url(protocol: &str, host: &str) -> String {
    let scheme = if protocol.starts_with("https") { "wss" } else { "ws" };
    format!("{scheme}://{host}/api/ws")
}

#[cfg(any(test, feature = "hydrate"))]
fn next_backoff(current_ms: u32) -> u32 {
    current_ms.saturating_mul(2).min(MAX_BACKOFF_MS)
}

type EventHandler = Arc<dyn Fn(ChannelEvent) + Send + Sync>;

/// Subscription handle owned by a view.
#[derive(Clone)]
pub struct RealtimeChannel {
    config: ChannelConfig,
    on_event: EventHandler,
    active: Arc<AtomicBool>,
}

impl std::fmt::Debug for RealtimeChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeChannel")
            .field("config", &self.config)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Create an inactive channel for `config`, delivering to `on_event`.
pub fn open<F>(config: ChannelConfig, on_event: F) -> RealtimeChannel
where
    F: Fn(ChannelEvent) + Send + Sync + 'static,
{
    RealtimeChannel {
        config,
        on_event: Arc::new(on_event),
        active: Arc::new(AtomicBool::new(false)),
    }
}

impl RealtimeChannel {
    /// Start delivering. Calling it on an active channel does nothing.
    pub fn activate(&self) {
        if self.active.swap(true, Ordering::SeqCst) {
            return;
        }
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(run(self.clone()));
    }

    /// Stop delivering and close the socket. Idempotent.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    #[cfg(any(test, feature = "hydrate"))]
    fn deliver(&self, frame: &Frame) {
        if !self.is_active() {
            return;
        }
        match parse_frame(frame, self.config) {
            Ok(Some(event)) => (self.on_event)(event),
            Ok(None) => {}
            Err(e) => leptos::logging::warn!("dropping malformed {} payload: {e}", frame.syscall),
        }
    }
}

/// Connection loop: connect, subscribe, deliver, back off, repeat while active.
#[cfg(feature = "hydrate")]
async fn run(channel: RealtimeChannel) {
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    while channel.is_active() {
        let location = web_sys::window().map(|w| w.location());
        let protocol = location
            .as_ref()
            .and_then(|l| l.protocol().ok())
            .unwrap_or_default();
        let host = location
            .as_ref()
            .and_then(|l| l.host().ok())
            .unwrap_or_else(|| "localhost:8080".to_owned());
        let url = channel_url(&protocol, &host);

        match connect_and_run(&url, &channel).await {
            Ok(true) => backoff_ms = INITIAL_BACKOFF_MS,
            Ok(false) => {}
            Err(e) => leptos::logging::warn!("realtime channel error: {e}"),
        }

        if !channel.is_active() {
            break;
        }
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = next_backoff(backoff_ms);
    }
    leptos::logging::log!("realtime channel closed");
}

/// One websocket session. Returns whether any frame was received.
#[cfg(feature = "hydrate")]
async fn connect_and_run(url: &str, channel: &RealtimeChannel) -> Result<bool, String> {
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    let subscribe = subscribe_frame(channel.config, js_sys::Date::now() as i64);
    ws_write
        .send(Message::Bytes(wire::encode_frame(&subscribe)))
        .await
        .map_err(|e| e.to_string())?;

    let mut received = false;
    let recv_task = async {
        while let Some(msg) = ws_read.next().await {
            match msg {
                Ok(Message::Bytes(bytes)) => match wire::decode_frame(&bytes) {
                    Ok(frame) => {
                        received = true;
                        channel.deliver(&frame);
                    }
                    Err(e) => leptos::logging::warn!("undecodable frame: {e}"),
                },
                Ok(Message::Text(_)) => {}
                Err(e) => {
                    leptos::logging::warn!("realtime recv error: {e}");
                    break;
                }
            }
        }
    };

    // Deactivation is observed by polling so the socket closes promptly even
    // when the topic is quiet.
    let stop_watch = async {
        while channel.is_active() {
            gloo_timers::future::sleep(std::time::Duration::from_millis(250)).await;
        }
    };

    futures::future::select(Box::pin(recv_task), Box::pin(stop_watch)).await;
    let _ = ws_write.close().await;
    Ok(received)
}
