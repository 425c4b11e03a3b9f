//! State for the home route's chat list.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use wire::model::User;

use crate::state::chat_view::ViewError;
use crate::state::chats::{self, ChatSummary};

#[derive(Clone, Debug, Default)]
pub struct HomeState {
    pub summaries: Vec<ChatSummary>,
    pub query: String,
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl HomeState {
    /// Rebuild the list from the viewer's latest record.
    pub fn refresh_from_user(&mut self, viewer: &User) {
        self.summaries = chats::summaries_for(viewer);
        self.loading = false;
        self.error = None;
    }

    /// Rows matching the current search query.
    pub fn visible(&self) -> Vec<ChatSummary> {
        chats::filter_by_name(&self.summaries, &self.query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Unread messages from others across every row. Rows the viewer wrote
    /// last count as sent, not unread.
    pub fn total_unread(&self, viewer_id: &str) -> u32 {
        self.summaries
            .iter()
            .filter(|s| s.last_user != viewer_id)
            .map(|s| s.unread_count)
            .fold(0, u32::saturating_add)
    }
}
