//! Last-known users, shared by every view through context.
//!
//! Fed by realtime `users:snapshot` frames and by one-off fetches. Last write
//! wins; there is no versioning.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use std::collections::BTreeMap;

use wire::model::User;

#[derive(Clone, Debug, Default)]
pub struct UsersCache {
    pub users: BTreeMap<String, User>,
}

impl UsersCache {
    /// Replace everything with a realtime snapshot.
    pub fn replace_all(&mut self, snapshot: BTreeMap<String, User>) {
        self.users = snapshot;
    }

    pub fn upsert(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Display name for a user id, falling back to the id itself.
    pub fn display_name(&self, user_id: &str) -> String {
        self.users
            .get(user_id)
            .map(|u| u.username.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| user_id.to_owned())
    }
}
