//! Friends, pending requests, and the new-chat form.

#[cfg(test)]
#[path = "friends_test.rs"]
mod friends_test;

use wire::model::{Friend, FriendStatus};

use crate::state::chat_view::ViewError;

#[derive(Clone, Debug, Default)]
pub struct FriendsState {
    pub friends: Vec<Friend>,
    pub requests: Vec<Friend>,
    pub loading: bool,
    pub error: Option<ViewError>,
    /// Outcome line of the last send/accept/reject.
    pub notice: Option<String>,
}

impl FriendsState {
    /// Drop a handled request from the pending list.
    pub fn resolve_request(&mut self, from_uid: &str) {
        self.requests.retain(|r| r.id != from_uid);
    }
}

/// Friends a new chat can be started with.
pub fn active_friends(friends: &[Friend]) -> Vec<&Friend> {
    friends
        .iter()
        .filter(|f| f.friendship_status == FriendStatus::Active)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewChatInvalid {
    NoFriendSelected,
    EmptyMessage,
}

impl NewChatInvalid {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoFriendSelected => "Choose a friend to chat with.",
            Self::EmptyMessage => "Write a first message.",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewChatForm {
    pub friend_id: Option<String>,
    pub message: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl NewChatForm {
    /// Selected friend id and trimmed first message, when both are present.
    ///
    /// # Errors
    ///
    /// Names the first missing field.
    pub fn validate(&self) -> Result<(String, String), NewChatInvalid> {
        let friend_id = self
            .friend_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(NewChatInvalid::NoFriendSelected)?;
        let message = self.message.trim();
        if message.is_empty() {
            return Err(NewChatInvalid::EmptyMessage);
        }
        Ok((friend_id, message.to_owned()))
    }
}
