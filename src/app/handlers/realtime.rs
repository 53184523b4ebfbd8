//! Realtime channel pushes

use crate::conversation::{ChannelIdentity, RawConversation};

use super::super::Console;

/// Push delivered by the realtime channel.
#[derive(Debug, Clone)]
pub enum RealtimeEvent {
    /// New message or metadata for one conversation
    ConversationUpdated(RawConversation),
    /// The waiting queue changed; its length must be re-fetched
    QueueUpdated,
    /// The conversation was closed or transferred elsewhere
    ChannelDeleted(ChannelIdentity),
}

impl Console {
    pub fn handle_realtime(&mut self, event: RealtimeEvent) {
        match event {
            RealtimeEvent::ConversationUpdated(raw) => self.handle_conversation_updated(raw),
            RealtimeEvent::QueueUpdated => self.refresh_waiting_count(),
            RealtimeEvent::ChannelDeleted(identity) => {
                self.remove_on_external_deletion(&identity);
            }
        }
    }

    fn handle_conversation_updated(&mut self, raw: RawConversation) {
        let record = match raw.into_record() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Dropping realtime update: {}", e);
                return;
            }
        };
        let identity = record.identity.clone();
        if !self.cache.apply_update(record) {
            tracing::debug!("Ignoring stale realtime update for {}", identity);
        }
    }
}
