//! Application state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plain structs held in `RwSignal`s and shared through Leptos context. The
//! pure reconciliation and policy modules (`messages`, `read_tracking`,
//! `chats`) carry no reactive types so they test natively.

pub mod auth;
pub mod chat_view;
pub mod chats;
pub mod friends;
pub mod home;
pub mod messages;
pub mod read_tracking;
pub mod users;
