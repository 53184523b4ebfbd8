//! Tuning constants shared across the engine
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Number of conversations requested per REST page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on identities tracked by the realtime cache.
/// Beyond this the least useful entries are evicted.
pub const DEFAULT_MAX_TRACKED_CONVERSATIONS: u64 = 10_000;

/// Upper bound on entries in the channel-info side cache.
pub const DEFAULT_MAX_CHANNEL_INFOS: u64 = 5_000;

/// HTTP request timeout for REST fetches in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Capacity of the command channel into the fetch actor.
pub const FETCH_COMMAND_CAPACITY: usize = 64;

/// Capacity of the event channel out of the fetch actor.
pub const FETCH_EVENT_CAPACITY: usize = 128;

/// Number of trailing channel-id characters used in placeholder names.
pub const PLACEHOLDER_TAG_LEN: usize = 4;
