//! WebSocket handler: topic-filtered pub/sub relay.
//!
//! DESIGN
//! ======
//! On upgrade, a connection subscribes to the state hub and enters a
//! `select!` loop:
//! - Incoming client frames → decode + dispatch by syscall
//! - Hub frames → forward when the connection subscribed to their topic
//!
//! A connection starts with no topics. `channel:subscribe` replaces the set
//! wholesale, is answered with a `Done` frame, and, when `users` is newly
//! included, with the current users snapshot so late subscribers start fresh.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → send `session:connected` with `client_id`
//! 2. Client sends `channel:subscribe { topics }`
//! 3. Hub frames for those topics are forwarded until close
//!
//! A lagging connection skips the frames it missed and keeps going; the next
//! snapshot supersedes them.

#[cfg(test)]
#[path = "ws_test.rs"]
mod ws_test;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use uuid::Uuid;
use wire::model::Subscribe;
use wire::{Frame, Status, Topic, topic};

use crate::state::{AppState, server_frame, users_snapshot_frame};

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Topics one connection wants delivered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Subscription {
    topics: Vec<Topic>,
}

impl Subscription {
    fn accepts(&self, frame: &Frame) -> bool {
        Topic::of_syscall(&frame.syscall).is_some_and(|t| self.topics.contains(&t))
    }
}

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let mut hub_rx = state.hub.subscribe();
    let mut subscription = Subscription::default();

    let welcome = server_frame(topic::SESSION_CONNECTED, None, json!({ "client_id": client_id.to_string() }));
    if send_frame(&mut socket, &welcome).await.is_err() {
        return;
    }
    info!(%client_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Binary(bytes) => {
                        let replies = process_inbound(&state, &mut subscription, client_id, &bytes).await;
                        if send_all(&mut socket, &replies).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            delivered = hub_rx.recv() => match delivered {
                Ok(frame) => {
                    if subscription.accepts(&frame) && send_frame(&mut socket, &frame).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%client_id, skipped, "ws: subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    info!(%client_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Decode and handle one inbound binary frame, returning frames for the
/// sender.
async fn process_inbound(state: &AppState, subscription: &mut Subscription, client_id: Uuid, bytes: &[u8]) -> Vec<Frame> {
    let req = match wire::decode_frame(bytes) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(%client_id, error = %e, "ws: invalid inbound frame");
            return vec![server_frame("gateway:error", None, json!({ "message": format!("invalid frame: {e}") }))];
        }
    };
    info!(%client_id, id = %req.id, syscall = %req.syscall, "ws: recv frame");

    if req.syscall != topic::CHANNEL_SUBSCRIBE {
        return vec![reply(&req, Status::Error, json!({ "message": format!("unknown syscall: {}", req.syscall) }))];
    }
    let wanted: Subscribe = match serde_json::from_value(req.data.clone()) {
        Ok(s) => s,
        Err(e) => {
            return vec![reply(&req, Status::Error, json!({ "message": format!("invalid subscribe payload: {e}") }))];
        }
    };

    let had_users = subscription.topics.contains(&Topic::Users);
    subscription.topics = wanted.topics;
    subscription.topics.sort_unstable();
    subscription.topics.dedup();

    let topics: Vec<&str> = subscription.topics.iter().copied().map(Topic::as_str).collect();
    let mut out = vec![reply(&req, Status::Done, json!({ "topics": topics }))];
    if !had_users && subscription.topics.contains(&Topic::Users) {
        out.push(users_snapshot_frame(&*state.store.read().await));
    }
    out
}

fn reply(req: &Frame, status: Status, data: serde_json::Value) -> Frame {
    let mut frame = server_frame(&req.syscall, req.chat_id.clone(), data);
    frame.parent_id = Some(req.id.clone());
    frame.status = status;
    frame
}

async fn send_all(socket: &mut WebSocket, frames: &[Frame]) -> Result<(), axum::Error> {
    for frame in frames {
        send_frame(socket, frame).await?;
    }
    Ok(())
}

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), axum::Error> {
    if frame.status == Status::Error {
        warn!(id = %frame.id, syscall = %frame.syscall, "ws: send frame status=Error");
    } else {
        info!(id = %frame.id, syscall = %frame.syscall, status = ?frame.status, "ws: send frame");
    }
    socket.send(Message::Binary(wire::encode_frame(frame).into())).await
}
