//! Fetch actor: runs REST requests off the event loop.
//!
//! - `mod.rs` - commands, events, and the handle
//! - `fetch.rs` - actor loop and request execution

mod fetch;

use tokio::sync::mpsc;

use crate::api::{ConversationPage, FetchError, PageQuery};
use crate::conversation::Tab;

pub use fetch::spawn_fetch_actor;

/// Whether a page replaces the snapshot or extends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Initial,
    More,
}

/// One page fetch issued by a tab. The ticket ties the completion back to
/// the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub ticket: u64,
    pub kind: PageKind,
    pub query: PageQuery,
}

impl PageRequest {
    pub fn tab(&self) -> Tab {
        self.query.tab
    }
}

/// Commands sent TO the fetch actor
#[derive(Debug)]
pub enum FetchCommand {
    Page(PageRequest),
    WaitingCount,
    Shutdown,
}

/// Events sent FROM the fetch actor
#[derive(Debug, Clone)]
pub enum FetchEvent {
    PageFetched {
        request: PageRequest,
        result: Result<ConversationPage, FetchError>,
    },
    WaitingCountFetched(Result<u32, FetchError>),
}

pub struct FetchActorHandle {
    pub cmd_tx: mpsc::Sender<FetchCommand>,
    pub event_rx: mpsc::Receiver<FetchEvent>,
}

impl FetchActorHandle {
    pub async fn shutdown(&self) {
        if let Err(e) = self.cmd_tx.send(FetchCommand::Shutdown).await {
            tracing::debug!("Fetch actor already stopped: {}", e);
        }
    }
}
