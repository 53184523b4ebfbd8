//! Tab pagination and the waiting count

use crate::actor::{FetchCommand, PageRequest};
use crate::api::FetchError;
use crate::conversation::Tab;

use super::super::Console;

impl Console {
    /// Load the active tab and the waiting count.
    pub fn start(&mut self) {
        self.activate(self.active_tab);
        self.refresh_waiting_count();
    }

    /// Initial load for `tab` unless already loaded or loading.
    pub fn activate(&mut self, tab: Tab) {
        if let Some(request) = self.tab_mut(tab).begin_activate() {
            self.dispatch_page(request);
        }
    }

    /// Fetch the next page of `tab`. No-op while a fetch is in flight or when
    /// the server has no more pages.
    pub fn request_load_more(&mut self, tab: Tab) {
        if let Some(request) = self.tab_mut(tab).begin_load_more() {
            self.dispatch_page(request);
        }
    }

    /// Reload `tab` from the first page, replacing the snapshot on success.
    pub fn request_force_refresh(&mut self, tab: Tab) {
        if let Some(request) = self.tab_mut(tab).begin_refresh() {
            self.dispatch_page(request);
        }
    }

    pub fn refresh_waiting_count(&mut self) {
        match self.fetcher.cmd_tx.try_send(FetchCommand::WaitingCount) {
            Ok(()) => self.waiting.pending += 1,
            Err(e) => tracing::warn!("Failed to request waiting count: {}", e),
        }
    }

    pub(crate) fn dispatch_page(&mut self, request: PageRequest) {
        tracing::debug!(
            "Dispatching {} page (ticket={}, offset={})",
            request.tab(),
            request.ticket,
            request.query.offset
        );
        if let Err(e) = self.fetcher.cmd_tx.try_send(FetchCommand::Page(request)) {
            let reason = e.to_string();
            if let FetchCommand::Page(request) = e.into_inner() {
                tracing::warn!("Failed to dispatch {} page: {}", request.tab(), reason);
                self.handle_page_fetched(request, Err(FetchError::Dispatch(reason)));
            }
        }
    }
}
