//! In-process caches shared across tabs.
//!
//! - `realtime` - freshest push-observed state per conversation
//! - `channel_info` - denormalized channel metadata forwarded by the fetcher

pub mod channel_info;
pub mod realtime;

pub use channel_info::ChannelInfoStore;
pub use realtime::RealtimeCache;
