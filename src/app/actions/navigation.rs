//! Tab switching, search and selection

use crate::app::state::Navigation;
use crate::conversation::{ChannelIdentity, Tab};
use crate::view::SearchFilter;

use super::super::Console;

impl Console {
    /// Make `tab` active, loading it on first activation.
    pub fn select_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            tracing::debug!("Switching tab {} -> {}", self.active_tab, tab);
            self.active_tab = tab;
        }
        self.activate(tab);
    }

    /// Set the search query applied to every tab's view. Blank clears it.
    pub fn set_search_query(&mut self, query: &str) {
        self.search = SearchFilter::new(query);
    }

    /// Select a conversation on the active tab, clearing its unread badge.
    pub fn select_conversation(&mut self, identity: &ChannelIdentity) {
        self.selection = Some(identity.clone());
        self.clear_unread_on_select(identity, self.active_tab);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Take the navigation request produced by the last reselect, if any.
    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.navigation.take()
    }
}
