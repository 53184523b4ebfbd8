//! Optimistic local edits to tab snapshots
//!
//! These touch only REST snapshots; the realtime cache stays a faithful
//! record of what the push channel delivered.

use crate::app::state::Navigation;
use crate::conversation::{ChannelIdentity, Tab};

use super::super::Console;

impl Console {
    /// Zero the unread count of `identity` in the "mine" and "all" snapshots.
    /// Selecting from the unassigned queue leaves counts untouched.
    pub fn clear_unread_on_select(&mut self, identity: &ChannelIdentity, tab: Tab) {
        if !tab.tracks_unread() {
            return;
        }
        for tab in [Tab::Mine, Tab::All] {
            if self.tab_mut(tab).clear_unread(identity) {
                tracing::debug!("Cleared unread for {} on {}", identity, tab);
            }
        }
    }

    /// Drop a conversation that was closed or transferred elsewhere.
    ///
    /// Removes it from the "mine" snapshot and hides it from the "mine" view
    /// until that tab reloads. The "all" tab is history and keeps showing it.
    /// If it was selected while "mine" was active, the neighbour at the same
    /// position is selected instead and returned as a navigation request
    /// (also kept for [`Console::take_navigation`]).
    pub fn remove_on_external_deletion(&mut self, identity: &ChannelIdentity) -> Option<Navigation> {
        let present = self
            .tab(Tab::Mine)
            .snapshot
            .records
            .iter()
            .any(|r| &r.identity == identity);
        if self.last_deletion.as_ref() == Some(identity) && !present {
            tracing::debug!("Deletion of {} already handled", identity);
            return None;
        }
        self.last_deletion = Some(identity.clone());

        let reselect =
            self.active_tab == Tab::Mine && self.selection.as_ref() == Some(identity);
        let position = if reselect {
            self.view(Tab::Mine)
                .items
                .iter()
                .position(|r| &r.identity == identity)
        } else {
            None
        };

        let mine = self.tab_mut(Tab::Mine);
        mine.remove(identity);
        mine.suppressed.insert(identity.clone());
        tracing::info!("Removed {} after external deletion", identity);

        if !reselect {
            return None;
        }

        let items = self.view(Tab::Mine).items;
        let next = position.and_then(|idx| items.get(idx.min(items.len().saturating_sub(1))));
        let navigation = match next {
            Some(record) => {
                self.selection = Some(record.identity.clone());
                Navigation::Open(record.identity.clone())
            }
            None => {
                self.selection = None;
                Navigation::Clear
            }
        };
        tracing::debug!("Reselect after deletion: {:?}", navigation);
        self.navigation = Some(navigation.clone());
        Some(navigation)
    }
}
