//! Pub/sub topics and the syscalls carried on them.

use serde::{Deserialize, Serialize};

/// Sent once by the server after the websocket upgrade.
pub const SESSION_CONNECTED: &str = "session:connected";
/// Client request listing the topics it wants delivered.
pub const CHANNEL_SUBSCRIBE: &str = "channel:subscribe";
/// Full users map, published after any user-affecting mutation.
pub const USERS_SNAPSHOT: &str = "users:snapshot";
/// Ordered message list for one chat, published after any message mutation.
pub const CHATS_MESSAGES: &str = "chats:messages";

/// A subscribable topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Users,
    Chats,
}

impl Topic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Chats => "chats",
        }
    }

    /// Topic a published syscall belongs to, if any.
    #[must_use]
    pub fn of_syscall(syscall: &str) -> Option<Self> {
        match syscall {
            USERS_SNAPSHOT => Some(Self::Users),
            CHATS_MESSAGES => Some(Self::Chats),
            _ => None,
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "users" => Some(Self::Users),
            "chats" => Some(Self::Chats),
            _ => None,
        }
    }
}
