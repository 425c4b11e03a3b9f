//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render list rows, message bubbles and shared chrome. They take
//! plain values and callbacks; pages own the state.

pub mod chat_row;
pub mod error_panel;
pub mod message_bubble;
pub mod nav_bar;
