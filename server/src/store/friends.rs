//! Friend lists and directed friend requests.

#[cfg(test)]
#[path = "friends_test.rs"]
mod friends_test;

use chrono::{DateTime, Utc};
use tracing::info;
use wire::model::{Friend, FriendLink, FriendStatus, User};

use super::{Store, StoreError, stamp};

const PENDING: &str = "pending";

fn friend_row(user: &User, status: FriendStatus, since: Option<String>) -> Friend {
    Friend {
        id: user.id.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        avatar: user.avatar.clone(),
        friendship_status: status,
        since,
    }
}

impl Store {
    /// The user's friends, skipping links to users that no longer exist.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown users.
    pub fn friends(&self, user_id: &str) -> Result<Vec<Friend>, StoreError> {
        let user = self.user(user_id)?;
        Ok(user
            .friends
            .iter()
            .filter_map(|(id, link)| {
                let friend = self.users.get(id)?;
                Some(friend_row(friend, link.status, link.since.clone()))
            })
            .collect())
    }

    /// Pending requests addressed to `user_id`, one row per sender.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown users.
    pub fn friend_requests(&self, user_id: &str) -> Result<Vec<Friend>, StoreError> {
        let user = self.user(user_id)?;
        Ok(user
            .friend_requests
            .keys()
            .filter_map(|from| self.users.get(from))
            .map(|sender| friend_row(sender, FriendStatus::Pending, None))
            .collect())
    }

    /// # Errors
    ///
    /// `Invalid` for a self-request; `NotFound` for unknown users; `Conflict`
    /// when the two are already active friends.
    pub fn send_friend_request(&mut self, from_uid: &str, to_uid: &str) -> Result<(), StoreError> {
        if from_uid == to_uid {
            return Err(StoreError::Invalid("cannot befriend yourself".to_owned()));
        }
        let sender = self.user(from_uid)?;
        if sender
            .friends
            .get(to_uid)
            .is_some_and(|link| link.status == FriendStatus::Active)
        {
            return Err(StoreError::Conflict(format!("{from_uid} and {to_uid} are already friends")));
        }
        self.user_mut(to_uid)?
            .friend_requests
            .insert(from_uid.to_owned(), PENDING.to_owned());
        info!(%from_uid, %to_uid, "store: friend request sent");
        Ok(())
    }

    /// Make both users active friends and drop the request.
    ///
    /// # Errors
    ///
    /// `NotFound` when no such pending request exists.
    pub fn accept_friend_request(&mut self, from_uid: &str, to_uid: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.user(from_uid)?;
        self.take_request(from_uid, to_uid)?;
        let link = FriendLink { status: FriendStatus::Active, since: Some(stamp(now)) };
        self.user_mut(to_uid)?
            .friends
            .insert(from_uid.to_owned(), link.clone());
        self.user_mut(from_uid)?.friends.insert(to_uid.to_owned(), link);
        info!(%from_uid, %to_uid, "store: friend request accepted");
        Ok(())
    }

    /// # Errors
    ///
    /// `NotFound` when no such pending request exists.
    pub fn reject_friend_request(&mut self, from_uid: &str, to_uid: &str) -> Result<(), StoreError> {
        self.take_request(from_uid, to_uid)?;
        info!(%from_uid, %to_uid, "store: friend request rejected");
        Ok(())
    }

    fn take_request(&mut self, from_uid: &str, to_uid: &str) -> Result<(), StoreError> {
        self.user_mut(to_uid)?
            .friend_requests
            .remove(from_uid)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("friend request {from_uid} -> {to_uid}")))
    }
}
