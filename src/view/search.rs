//! Search filter over a merged view.

use aho_corasick::AhoCorasick;

use crate::conversation::ConversationRecord;

/// Case-insensitive substring filter on display name and last message.
/// Holds the compiled automaton so repeated recomputation reuses it.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    query: String,
    automaton: AhoCorasick,
}

impl SearchFilter {
    /// Returns None for an empty or whitespace-only query (nothing to filter).
    /// Otherwise the query is matched as typed, surrounding spaces included.
    pub fn new(query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }
        let query = query.to_lowercase();
        let automaton = match AhoCorasick::new([&query]) {
            Ok(ac) => ac,
            Err(e) => {
                tracing::warn!("Failed to build search automaton for '{}': {}", query, e);
                return None;
            }
        };
        Some(Self { query, automaton })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self, record: &ConversationRecord) -> bool {
        self.automaton
            .is_match(&record.display_name().to_lowercase())
            || self
                .automaton
                .is_match(&record.last_message_text.to_lowercase())
    }

    /// Keep matching records; never reorders.
    pub fn apply(&self, records: Vec<ConversationRecord>) -> Vec<ConversationRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Filter `records` by `query`; a blank query returns the input unchanged.
pub fn filter_view(records: Vec<ConversationRecord>, query: &str) -> Vec<ConversationRecord> {
    match SearchFilter::new(query) {
        Some(filter) => filter.apply(records),
        None => records,
    }
}
