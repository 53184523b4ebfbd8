//! Receiving fetch actor events

use super::Console;

impl Console {
    /// Apply every fetch event already queued, without waiting.
    /// Returns true if anything was applied.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.fetcher.event_rx.try_recv() {
            self.handle_fetch_event(event);
            changed = true;
        }
        changed
    }

    /// Wait for the next fetch event and apply it. Returns false once the
    /// fetch actor has gone away.
    pub async fn next_event(&mut self) -> bool {
        match self.fetcher.event_rx.recv().await {
            Some(event) => {
                self.handle_fetch_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until no request is outstanding.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            if !self.next_event().await {
                tracing::warn!("Fetch actor stopped with requests outstanding");
                break;
            }
        }
    }
}
