//! Merge of a tab's REST snapshot with the realtime cache.
//!
//! The result is deduplicated by [`ChannelIdentity`] and sorted by
//! `last_message_at` descending. The sort is stable, so ties keep snapshot
//! order first and cache insertion order after it, and merging unchanged
//! inputs twice yields the same sequence.

use std::collections::HashSet;

use crate::cache::RealtimeCache;
use crate::conversation::{ChannelIdentity, ConversationRecord, Tab};

/// Build the visible list for `tab`.
///
/// - Snapshot entries take the cache's message, timestamp, unread count and
///   priority when the cached record is strictly newer and has content.
/// - Cache entries unknown to the snapshot are appended if they have content.
/// - Identities in `suppressed` are hidden, except on the "all" tab which
///   keeps closed and removed conversations visible.
pub fn merge_view(
    tab: Tab,
    snapshot: &[ConversationRecord],
    cache: &RealtimeCache,
    suppressed: &HashSet<ChannelIdentity>,
) -> Vec<ConversationRecord> {
    let hidden = |identity: &ChannelIdentity| tab != Tab::All && suppressed.contains(identity);

    let mut known: HashSet<&ChannelIdentity> = HashSet::with_capacity(snapshot.len());
    let mut merged: Vec<ConversationRecord> = Vec::with_capacity(snapshot.len());

    for record in snapshot {
        if !known.insert(&record.identity) || hidden(&record.identity) {
            continue;
        }

        let mut entry = record.clone();
        if let Some(live) = cache.get(&record.identity)
            && live.last_message_at > entry.last_message_at
            && live.has_message()
        {
            entry.absorb_live(&live);
        }
        merged.push(entry);
    }

    for live in cache.all() {
        if known.contains(&live.identity) || !live.has_message() || hidden(&live.identity) {
            continue;
        }
        merged.push(live.as_ref().clone());
    }

    merged.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    merged
}
