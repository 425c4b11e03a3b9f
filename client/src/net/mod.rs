//! Networking: the REST façade and the realtime channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles request/response calls, `channel` manages websocket
//! subscriptions. Together they are the only boundary to the backend.

pub mod api;
pub mod channel;
