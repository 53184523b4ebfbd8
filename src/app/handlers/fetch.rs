//! Fetch actor completions

use crate::actor::{FetchEvent, PageRequest};
use crate::api::{ConversationPage, FetchError};

use super::super::Console;

impl Console {
    pub(crate) fn handle_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::PageFetched { request, result } => {
                self.handle_page_fetched(request, result);
            }
            FetchEvent::WaitingCountFetched(result) => self.waiting.apply(result),
        }
    }

    pub(crate) fn handle_page_fetched(
        &mut self,
        request: PageRequest,
        result: Result<ConversationPage, FetchError>,
    ) {
        let tab = request.tab();
        if let Some(follow_up) = self.tab_mut(tab).complete(&request, result) {
            self.dispatch_page(follow_up);
        }
    }
}
