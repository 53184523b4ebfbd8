//! Conversation data model: identities, records, and payload normalization.

pub mod identity;
pub mod normalize;
pub mod types;

pub use identity::ChannelIdentity;
pub use normalize::{
    NormalizeError, RawChannelInfo, RawConversation, normalize_batch, normalize_channel_info_values,
    normalize_channel_infos, normalize_conversation_values,
};
pub use types::{ChannelInfo, ConversationRecord, Metadata, Priority, Tab};
