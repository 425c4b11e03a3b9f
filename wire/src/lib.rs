//! Shared wire model for the chat client, the dev data service, and the e2e
//! flows.
//!
//! Two representations live here:
//!
//! - [`frame`]: the realtime envelope pushed over the websocket channel,
//!   encoded as protobuf with a flexible JSON payload.
//! - [`model`]: the JSON records exchanged over HTTP and carried inside
//!   realtime payloads (messages, chats, users, summaries, friends).
//!
//! [`topic`] names the pub/sub topics and the syscalls that travel on them;
//! [`time`] orders the RFC 3339 timestamps both sides sort by.

pub mod frame;
pub mod model;
pub mod time;
pub mod topic;

pub use frame::{CodecError, Frame, Status, decode_frame, encode_frame};
pub use topic::Topic;
