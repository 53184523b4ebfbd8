//! Normalization of REST and push payloads into [`ConversationRecord`]s.
//!
//! Payloads are loosely shaped JSON objects. Identity fields are mandatory;
//! everything the engine does not interpret is kept as opaque metadata.

use chrono::DateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::identity::ChannelIdentity;
use super::types::{ChannelInfo, ConversationRecord, Metadata, Priority};

/// Values above this are treated as epoch milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("record has no channel id")]
    MissingChannelId,
    #[error("record {0} has no channel type")]
    MissingChannelType(String),
    #[error("unparseable timestamp: {0}")]
    InvalidTimestamp(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Conversation summary as delivered by the REST source or the realtime channel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConversation {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_type: Option<u8>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    /// Dedicated ordering field; preferred over `timestamp` when present.
    #[serde(default)]
    pub last_msg_seconds: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub unread: Option<u32>,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(flatten)]
    pub extra: Metadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChannelInfo {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_type: Option<u8>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Metadata,
}

fn identity_of(
    channel_id: Option<String>,
    channel_type: Option<u8>,
) -> Result<ChannelIdentity, NormalizeError> {
    let channel_id = channel_id
        .filter(|id| !id.is_empty())
        .ok_or(NormalizeError::MissingChannelId)?;
    let channel_type =
        channel_type.ok_or_else(|| NormalizeError::MissingChannelType(channel_id.clone()))?;
    Ok(ChannelIdentity::new(channel_id, channel_type))
}

/// Convert a loosely typed timestamp to epoch seconds.
pub fn epoch_seconds(raw: &RawTimestamp) -> Result<i64, NormalizeError> {
    let scale = |v: i64| if v > MILLIS_THRESHOLD { v / 1000 } else { v };
    match raw {
        RawTimestamp::Int(v) => Ok(scale(*v)),
        RawTimestamp::Float(v) if v.is_finite() => Ok(scale(*v as i64)),
        RawTimestamp::Float(v) => Err(NormalizeError::InvalidTimestamp(v.to_string())),
        RawTimestamp::Text(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                return Ok(scale(v));
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp())
                .map_err(|_| NormalizeError::InvalidTimestamp(s.to_string()))
        }
    }
}

impl RawConversation {
    pub fn into_record(self) -> Result<ConversationRecord, NormalizeError> {
        let identity = identity_of(self.channel_id, self.channel_type)?;

        let last_message_at = match (self.last_msg_seconds, self.timestamp.as_ref()) {
            (Some(seconds), _) => seconds,
            (None, Some(ts)) => epoch_seconds(ts).unwrap_or_else(|e| {
                tracing::warn!("Treating {} as stale: {}", identity, e);
                0
            }),
            (None, None) => 0,
        };

        Ok(ConversationRecord {
            identity,
            display_name: self.name.filter(|n| !n.is_empty()),
            last_message_text: self.last_message.unwrap_or_default(),
            last_message_at,
            unread_count: self.unread.unwrap_or(0),
            priority: self.priority.map(Priority),
            metadata: self.extra,
        })
    }
}

impl RawChannelInfo {
    pub fn into_channel_info(self) -> Result<ChannelInfo, NormalizeError> {
        Ok(ChannelInfo {
            identity: identity_of(self.channel_id, self.channel_type)?,
            name: self.name,
            avatar: self.avatar,
            extra: self.extra,
        })
    }
}

/// Normalize a batch, dropping records with missing identity fields.
/// A single corrupt entry never fails the batch.
pub fn normalize_batch(raws: Vec<RawConversation>) -> Vec<ConversationRecord> {
    raws.into_iter()
        .filter_map(|raw| match raw.into_record() {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Dropping malformed conversation: {}", e);
                None
            }
        })
        .collect()
}

/// Decode each JSON entry on its own; badly typed entries are dropped.
fn decode_entries<T: DeserializeOwned>(values: Vec<Value>, kind: &str) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("Dropping undecodable {}: {}", kind, e);
                None
            }
        })
        .collect()
}

/// Normalize untyped JSON entries from a page body.
pub fn normalize_conversation_values(values: Vec<Value>) -> Vec<ConversationRecord> {
    normalize_batch(decode_entries(values, "conversation"))
}

pub fn normalize_channel_info_values(values: Vec<Value>) -> Vec<ChannelInfo> {
    normalize_channel_infos(decode_entries(values, "channel info"))
}

pub fn normalize_channel_infos(raws: Vec<RawChannelInfo>) -> Vec<ChannelInfo> {
    raws.into_iter()
        .filter_map(|raw| match raw.into_channel_info() {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Dropping malformed channel info: {}", e);
                None
            }
        })
        .collect()
}
