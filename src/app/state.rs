//! Console state types
//!
//! All state types live here to maintain clean dependency:
//! presentation imports from the app layer, not vice versa.

use std::collections::HashSet;

use crate::actor::{PageKind, PageRequest};
use crate::api::{ConversationPage, FetchError, PageQuery};
use crate::config::SyncConfig;
use crate::conversation::{ChannelIdentity, ConversationRecord, Tab};

/// Request issued by the console to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Open(ChannelIdentity),
    /// Nothing left to show
    Clear,
}

/// REST-sourced records for one tab, as of the last successful fetch.
#[derive(Debug, Clone, Default)]
pub struct TabSnapshot {
    /// Server order
    pub records: Vec<ConversationRecord>,
    /// Offset of the next page; tracks `records.len()` and resets to 0 on refresh
    pub offset: usize,
    pub has_more: bool,
}

impl TabSnapshot {
    fn replace(&mut self, records: Vec<ConversationRecord>) {
        self.records.clear();
        self.offset = 0;
        self.append(records);
    }

    /// Append a page, skipping identities the snapshot already holds
    /// (the server list can shift between pages).
    fn append(&mut self, records: Vec<ConversationRecord>) {
        let mut known: HashSet<ChannelIdentity> =
            self.records.iter().map(|r| r.identity.clone()).collect();
        for record in records {
            if known.insert(record.identity.clone()) {
                self.records.push(record);
            } else {
                tracing::debug!("Skipping duplicate {} in page", record.identity);
            }
        }
        self.offset = self.records.len();
    }

    fn position(&self, identity: &ChannelIdentity) -> Option<usize> {
        self.records.iter().position(|r| &r.identity == identity)
    }
}

/// Fetch lifecycle of one tab. A ticket marks the single request in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// Never loaded
    #[default]
    Idle,
    Loading {
        ticket: u64,
    },
    LoadingMore {
        ticket: u64,
    },
    Loaded,
    /// Last fetch failed; records are whatever was loaded before
    Failed,
}

/// Pagination controller for exactly one tab.
///
/// Every `begin_*` method either returns the request to issue (and moves the
/// phase to an in-flight state) or returns None. Nothing is issued while a
/// request is in flight, so a tab never has two fetches outstanding.
#[derive(Debug, Clone)]
pub struct TabState {
    pub tab: Tab,
    pub snapshot: TabSnapshot,
    pub phase: FetchPhase,
    pub load_error: Option<FetchError>,
    /// Identities removed locally that the realtime cache must not bring back
    pub suppressed: HashSet<ChannelIdentity>,
    settings: SyncConfig,
    /// Set by a successful initial load, cleared by refresh or a failed initial load
    loaded: bool,
    /// A refresh arrived while a request was in flight
    refresh_queued: bool,
    next_ticket: u64,
}

impl TabState {
    pub fn new(tab: Tab, settings: SyncConfig) -> Self {
        Self {
            tab,
            snapshot: TabSnapshot::default(),
            phase: FetchPhase::Idle,
            load_error: None,
            suppressed: HashSet::new(),
            settings,
            loaded: false,
            refresh_queued: false,
            next_ticket: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Loading { .. })
    }

    pub fn is_loading_more(&self) -> bool {
        matches!(self.phase, FetchPhase::LoadingMore { .. })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn in_flight(&self) -> Option<u64> {
        match self.phase {
            FetchPhase::Loading { ticket } | FetchPhase::LoadingMore { ticket } => Some(ticket),
            _ => None,
        }
    }

    /// Initial load on first activation. No-op once loaded or while in flight.
    pub fn begin_activate(&mut self) -> Option<PageRequest> {
        if let Some(ticket) = self.in_flight() {
            tracing::debug!("{} already fetching (ticket={})", self.tab, ticket);
            return None;
        }
        if self.loaded {
            return None;
        }
        Some(self.start(PageKind::Initial))
    }

    /// Next page. No-op while in flight, before the first load, or when the
    /// server reported no more pages.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.in_flight().is_some() || !self.loaded || !self.snapshot.has_more {
            return None;
        }
        Some(self.start(PageKind::More))
    }

    /// Drop the loaded guard and reload from offset 0. If a request is in
    /// flight the reload is queued behind it and its result discarded.
    pub fn begin_refresh(&mut self) -> Option<PageRequest> {
        self.loaded = false;
        match self.in_flight() {
            Some(ticket) => {
                tracing::debug!("{} refresh queued behind ticket {}", self.tab, ticket);
                self.refresh_queued = true;
                self.phase = FetchPhase::Loading { ticket };
                None
            }
            None => Some(self.start(PageKind::Initial)),
        }
    }

    fn start(&mut self, kind: PageKind) -> PageRequest {
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        let offset = match kind {
            PageKind::Initial => 0,
            PageKind::More => self.snapshot.offset,
        };
        self.phase = match kind {
            PageKind::Initial => FetchPhase::Loading { ticket },
            PageKind::More => FetchPhase::LoadingMore { ticket },
        };

        PageRequest {
            ticket,
            kind,
            query: PageQuery {
                tab: self.tab,
                page_size: self.settings.page_size,
                offset,
                only_recently_completed: self.tab == Tab::All
                    && self.settings.only_recently_completed,
            },
        }
    }

    /// Apply the outcome of `request`. Returns a follow-up request when a
    /// queued refresh must now be issued.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        result: Result<ConversationPage, FetchError>,
    ) -> Option<PageRequest> {
        if self.in_flight() != Some(request.ticket) {
            tracing::debug!(
                "{} ignoring completion for ticket {} (phase {:?})",
                self.tab,
                request.ticket,
                self.phase
            );
            return None;
        }

        if self.refresh_queued {
            self.refresh_queued = false;
            tracing::debug!(
                "{} discarding superseded ticket {}",
                self.tab,
                request.ticket
            );
            return Some(self.start(PageKind::Initial));
        }

        match result {
            Ok(page) => {
                let fetched = page.records.len();
                match request.kind {
                    PageKind::Initial => {
                        self.snapshot.replace(page.records);
                        self.suppressed.clear();
                        self.loaded = true;
                    }
                    PageKind::More => self.snapshot.append(page.records),
                }
                self.snapshot.has_more = page.has_more;
                self.load_error = None;
                self.phase = FetchPhase::Loaded;
                tracing::info!(
                    "{} loaded {} conversations (total={}, has_more={})",
                    self.tab,
                    fetched,
                    self.snapshot.records.len(),
                    self.snapshot.has_more
                );
            }
            Err(e) => {
                tracing::warn!("{} fetch failed: {}", self.tab, e);
                if request.kind == PageKind::Initial {
                    self.loaded = false;
                }
                self.load_error = Some(e);
                self.phase = FetchPhase::Failed;
            }
        }
        None
    }

    /// Zero the unread count of `identity` in the snapshot. Returns true if found.
    pub fn clear_unread(&mut self, identity: &ChannelIdentity) -> bool {
        match self.snapshot.position(identity) {
            Some(idx) => {
                self.snapshot.records[idx].unread_count = 0;
                true
            }
            None => false,
        }
    }

    /// Remove `identity` from the snapshot. Returns true if it was present.
    pub fn remove(&mut self, identity: &ChannelIdentity) -> bool {
        let before = self.snapshot.records.len();
        self.snapshot.records.retain(|r| &r.identity != identity);
        self.snapshot.offset = self.snapshot.records.len();
        before != self.snapshot.offset
    }
}

/// Length of the server-side waiting queue, tracked apart from the
/// paginated "unassigned" list.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitingCount {
    pub value: u32,
    /// Requests issued but not yet answered
    pub pending: usize,
}

impl WaitingCount {
    /// Apply a fetch outcome; a failure keeps the previous value.
    pub fn apply(&mut self, result: Result<u32, FetchError>) {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(value) => {
                tracing::debug!("Waiting count {} -> {}", self.value, value);
                self.value = value;
            }
            Err(e) => {
                tracing::warn!("Waiting count refresh failed, keeping {}: {}", self.value, e);
            }
        }
    }
}

/// Everything the presentation layer needs to render one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabView {
    pub tab: Tab,
    /// Merged, sorted and search-filtered
    pub items: Vec<ConversationRecord>,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub has_more: bool,
    pub load_error: Option<FetchError>,
    pub waiting_count: u32,
}
