//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetches, realtime channels,
//! listeners) and delegates rendering details to `components`. Pages that
//! subscribe to realtime topics deactivate their channel in `on_cleanup`.

pub mod chat;
pub mod friends;
pub mod home;
pub mod login;
pub mod new_chat;
pub mod profile;
pub mod register;
pub mod user;
