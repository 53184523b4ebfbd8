//! Seams to the backend: the conversation REST source and the channel-info sink.
//!
//! - `mod.rs` - traits, request/response types, error taxonomy
//! - `http.rs` - reqwest implementation of [`ConversationApi`]

mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::{ChannelInfo, ConversationRecord, Tab};

pub use http::HttpConversationApi;

/// Failure of a REST fetch. Stored per tab as the load error, so it is
/// cheap to clone and compare.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("fetcher unavailable: {0}")]
    Dispatch(String),
}

#[derive(Debug, Error)]
#[error("channel info sink failed: {0}")]
pub struct SinkError(pub String);

/// One page request against a tab's REST source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub tab: Tab,
    pub page_size: usize,
    pub offset: usize,
    /// Only honored by the "all" source.
    pub only_recently_completed: bool,
}

/// A normalized page of conversations plus the denormalized channel sidecar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationPage {
    pub records: Vec<ConversationRecord>,
    pub has_more: bool,
    pub channels: Vec<ChannelInfo>,
}

#[async_trait]
pub trait ConversationApi: Send + Sync {
    async fn fetch_conversations(&self, query: &PageQuery) -> Result<ConversationPage, FetchError>;

    /// Full server-side length of the waiting queue.
    async fn fetch_waiting_count(&self) -> Result<u32, FetchError>;
}

/// Write-only destination for channel metadata embedded in fetch responses.
pub trait ChannelInfoSink: Send + Sync {
    fn store(&self, infos: Vec<ChannelInfo>) -> Result<(), SinkError>;
}
