//! Console core - owns tab state and coordinates fetches, pushes and local edits
//!
//! `impl Console` is split across:
//! - `actions/` - operations invoked by the host (tabs, search, selection, mutations)
//! - `handlers/` - completions from the fetch actor and realtime pushes
//! - `event_loop.rs` - receiving fetch events

mod actions;
mod event_loop;
mod handlers;
pub mod state;

use std::sync::Arc;

use crate::actor::FetchActorHandle;
use crate::cache::RealtimeCache;
use crate::config::SyncConfig;
use crate::conversation::{ChannelIdentity, ConversationRecord, Tab};
use crate::view::{SearchFilter, merge_view};

pub use handlers::RealtimeEvent;
use state::{Navigation, TabState, TabView, WaitingCount};

pub struct Console {
    /// Shared with whatever feeds realtime updates
    pub(crate) cache: Arc<RealtimeCache>,
    /// Indexed by [`Tab::index`]
    pub(crate) tabs: [TabState; 3],
    pub(crate) active_tab: Tab,
    pub(crate) search: Option<SearchFilter>,
    pub(crate) selection: Option<ChannelIdentity>,
    pub(crate) waiting: WaitingCount,
    pub(crate) fetcher: FetchActorHandle,
    /// Identity handled by the most recent deletion, so a re-delivered
    /// notification is a no-op
    pub(crate) last_deletion: Option<ChannelIdentity>,
    /// Navigation produced by the last reselect, not yet taken by the host
    pub(crate) navigation: Option<Navigation>,
}

impl Console {
    pub fn new(settings: SyncConfig, cache: Arc<RealtimeCache>, fetcher: FetchActorHandle) -> Self {
        let tabs = Tab::ALL.map(|tab| TabState::new(tab, settings.clone()));
        Self {
            cache,
            tabs,
            active_tab: Tab::default(),
            search: None,
            selection: None,
            waiting: WaitingCount::default(),
            fetcher,
            last_deletion: None,
            navigation: None,
        }
    }

    pub fn cache(&self) -> &Arc<RealtimeCache> {
        &self.cache
    }

    pub fn tab(&self, tab: Tab) -> &TabState {
        &self.tabs[tab.index()]
    }

    pub(crate) fn tab_mut(&mut self, tab: Tab) -> &mut TabState {
        &mut self.tabs[tab.index()]
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn selection(&self) -> Option<&ChannelIdentity> {
        self.selection.as_ref()
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.query())
    }

    pub fn waiting_count(&self) -> u32 {
        self.waiting.value
    }

    /// Snapshot merged with the realtime cache, before search filtering.
    pub fn merged(&self, tab: Tab) -> Vec<ConversationRecord> {
        let state = self.tab(tab);
        merge_view(tab, &state.snapshot.records, &self.cache, &state.suppressed)
    }

    /// Presentation model for `tab`, recomputed from current inputs.
    pub fn view(&self, tab: Tab) -> TabView {
        let merged = self.merged(tab);
        let items = match self.search {
            Some(ref filter) => filter.apply(merged),
            None => merged,
        };
        let state = self.tab(tab);
        TabView {
            tab,
            items,
            is_loading: state.is_loading(),
            is_loading_more: state.is_loading_more(),
            has_more: state.snapshot.has_more,
            load_error: state.load_error.clone(),
            waiting_count: self.waiting.value,
        }
    }

    pub fn active_view(&self) -> TabView {
        self.view(self.active_tab)
    }

    /// Whether any tab or the waiting count has a request outstanding
    pub fn is_busy(&self) -> bool {
        self.waiting.pending > 0 || self.tabs.iter().any(|t| t.in_flight().is_some())
    }

    pub async fn shutdown(&self) {
        self.fetcher.shutdown().await;
    }
}
