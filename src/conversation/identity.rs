use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::PLACEHOLDER_TAG_LEN;

/// Addressable conversation thread: channel id plus channel type discriminator.
/// Two identities are equal iff both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub channel_id: String,
    pub channel_type: u8,
}

impl ChannelIdentity {
    pub fn new(channel_id: impl Into<String>, channel_type: u8) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_type,
        }
    }

    /// Short tag derived from the trailing digits of the channel id, used when
    /// a conversation has no known display name. Falls back to the last
    /// characters when the id does not end in digits.
    pub fn short_tag(&self) -> String {
        let digits: Vec<char> = self
            .channel_id
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect();

        let source: Vec<char> = if digits.is_empty() {
            self.channel_id.chars().rev().take(PLACEHOLDER_TAG_LEN).collect()
        } else {
            digits.into_iter().take(PLACEHOLDER_TAG_LEN).collect()
        };

        source.into_iter().rev().collect()
    }
}

impl fmt::Display for ChannelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel_type, self.channel_id)
    }
}
