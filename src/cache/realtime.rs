//! Realtime conversation cache.
//!
//! Keyed by [`ChannelIdentity`], holds the most recently observed record per
//! conversation. Writes are monotonic in `last_message_at`: an update that is
//! not strictly newer than the cached entry is ignored, so out-of-order
//! delivery can never regress a conversation to older content.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::ops::compute::{CompResult, Op};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::constants::DEFAULT_MAX_TRACKED_CONVERSATIONS;
use crate::conversation::{ChannelIdentity, ConversationRecord};

#[derive(Debug, Clone)]
struct LiveEntry {
    /// First-insertion sequence; gives the cache a stable iteration order.
    seq: u64,
    record: Arc<ConversationRecord>,
}

/// Shared store of push-delivered conversation summaries.
///
/// Construct one per session and hand an `Arc` to every consumer. Bounded by
/// `max_capacity` tracked identities. Eviction is least-recently-used, so a
/// newly observed conversation is always admitted and the coldest one goes.
pub struct RealtimeCache {
    entries: Cache<ChannelIdentity, LiveEntry>,
    next_seq: AtomicU64,
}

impl Default for RealtimeCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TRACKED_CONVERSATIONS)
    }
}

impl RealtimeCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Insert or overwrite the entry for `record.identity` if the record is
    /// strictly newer than what is cached. Returns true if the cache changed.
    pub fn apply_update(&self, record: ConversationRecord) -> bool {
        let key = record.identity.clone();
        let incoming = record.last_message_at;

        let result = self.entries.entry(key).and_compute_with(|existing| {
            match existing {
                Some(entry) if entry.value().record.last_message_at >= incoming => Op::Nop,
                Some(entry) => Op::Put(LiveEntry {
                    seq: entry.value().seq,
                    record: Arc::new(record),
                }),
                None => Op::Put(LiveEntry {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    record: Arc::new(record),
                }),
            }
        });

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                tracing::debug!(
                    "Realtime cache updated {} (ts={})",
                    entry.key(),
                    entry.value().record.last_message_at
                );
                true
            }
            CompResult::Unchanged(entry) => {
                tracing::debug!(
                    "Ignoring stale update for {} (cached ts={}, incoming ts={})",
                    entry.key(),
                    entry.value().record.last_message_at,
                    incoming
                );
                false
            }
            CompResult::Removed(_) | CompResult::StillNone(_) => false,
        }
    }

    pub fn get(&self, identity: &ChannelIdentity) -> Option<Arc<ConversationRecord>> {
        self.entries.get(identity).map(|entry| entry.record)
    }

    /// Snapshot of every cached record in first-insertion order.
    /// The iterator is consumed once; call again for a fresh snapshot.
    pub fn all(&self) -> impl Iterator<Item = Arc<ConversationRecord>> + use<> {
        let mut entries: Vec<LiveEntry> = self.entries.iter().map(|(_, entry)| entry).collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.record)
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, ts: i64, msg: &str) -> ConversationRecord {
        ConversationRecord {
            last_message_text: msg.to_string(),
            last_message_at: ts,
            ..ConversationRecord::new(ChannelIdentity::new(id, 5))
        }
    }

    #[test]
    fn test_insert_when_absent() {
        let cache = RealtimeCache::default();
        assert!(cache.apply_update(record("a", 100, "hi")));
        let cached = cache.get(&ChannelIdentity::new("a", 5)).unwrap();
        assert_eq!(cached.last_message_text, "hi");
        assert!(cache.get(&ChannelIdentity::new("a", 1)).is_none());
    }

    #[test]
    fn test_never_regresses() {
        let cache = RealtimeCache::default();
        cache.apply_update(record("a", 150, "hello"));

        // Older and equal timestamps leave the entry untouched.
        assert!(!cache.apply_update(record("a", 100, "hi")));
        assert!(!cache.apply_update(record("a", 150, "duplicate")));
        let cached = cache.get(&ChannelIdentity::new("a", 5)).unwrap();
        assert_eq!(cached.last_message_text, "hello");

        assert!(cache.apply_update(record("a", 151, "newer")));
        let cached = cache.get(&ChannelIdentity::new("a", 5)).unwrap();
        assert_eq!(cached.last_message_text, "newer");
    }

    #[test]
    fn test_all_keeps_first_insertion_order() {
        let cache = RealtimeCache::default();
        cache.apply_update(record("b", 10, "x"));
        cache.apply_update(record("a", 20, "y"));
        cache.apply_update(record("c", 5, "z"));
        // Overwrite keeps the original position.
        cache.apply_update(record("b", 30, "x2"));

        let ids: Vec<String> = cache
            .all()
            .map(|r| r.identity.channel_id.clone())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        let again: Vec<String> = cache
            .all()
            .map(|r| r.identity.channel_id.clone())
            .collect();
        assert_eq!(ids, again);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_new_identity_admitted_at_capacity() {
        let cache = RealtimeCache::new(2);
        cache.apply_update(record("a", 100, "a"));
        cache.apply_update(record("b", 100, "b"));
        for _ in 0..10 {
            cache.get(&ChannelIdentity::new("a", 5));
            cache.get(&ChannelIdentity::new("b", 5));
        }
        assert_eq!(cache.len(), 2);

        assert!(cache.apply_update(record("c", 500, "fresh")));
        assert_eq!(cache.len(), 2);
        let cached = cache.get(&ChannelIdentity::new("c", 5)).unwrap();
        assert_eq!(cached.last_message_at, 500);

        // Still monotonic for the admitted entry
        assert!(!cache.apply_update(record("c", 10, "old")));
        let cached = cache.get(&ChannelIdentity::new("c", 5)).unwrap();
        assert_eq!(cached.last_message_text, "fresh");
    }
}
