use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::identity::ChannelIdentity;

/// One of the independent conversation lists shown in the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Conversations assigned to the current agent
    #[default]
    Mine,
    /// Conversations waiting in the queue
    Unassigned,
    /// Complete history, including closed conversations
    All,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Mine, Tab::Unassigned, Tab::All];

    pub fn index(self) -> usize {
        match self {
            Self::Mine => 0,
            Self::Unassigned => 1,
            Self::All => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mine => "mine",
            Self::Unassigned => "unassigned",
            Self::All => "all",
        }
    }

    /// Unread counts only mean something once a conversation has an owner.
    pub fn tracks_unread(self) -> bool {
        !matches!(self, Self::Unassigned)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mine" => Ok(Self::Mine),
            "unassigned" => Ok(Self::Unassigned),
            "all" => Ok(Self::All),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

/// Display-only fields carried through the engine untouched.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Ordinal priority attached to a conversation by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub u8);

/// Normalized in-memory representation of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub identity: ChannelIdentity,
    pub display_name: Option<String>,
    pub last_message_text: String,
    /// Ordering key. Non-decreasing for a given identity across legitimate updates.
    pub last_message_at: i64,
    pub unread_count: u32,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ConversationRecord {
    pub fn new(identity: ChannelIdentity) -> Self {
        Self {
            identity,
            display_name: None,
            last_message_text: String::new(),
            last_message_at: 0,
            unread_count: 0,
            priority: None,
            metadata: Metadata::new(),
        }
    }

    /// Whether the record carries real message content.
    pub fn has_message(&self) -> bool {
        !self.last_message_text.is_empty()
    }

    /// Name shown in the list; falls back to a placeholder built from the channel id.
    pub fn display_name(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Visitor {}", self.identity.short_tag()),
        }
    }

    /// Overwrite the realtime-owned fields with those of a fresher record,
    /// keeping name and metadata.
    pub fn absorb_live(&mut self, live: &ConversationRecord) {
        self.last_message_text = live.last_message_text.clone();
        self.last_message_at = live.last_message_at;
        self.unread_count = live.unread_count;
        self.priority = live.priority;
    }
}

/// Denormalized per-channel metadata that arrives alongside a page of conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub identity: ChannelIdentity,
    pub name: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub extra: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_parse_and_unread_semantics() {
        assert_eq!("Mine".parse::<Tab>(), Ok(Tab::Mine));
        assert_eq!("all".parse::<Tab>(), Ok(Tab::All));
        assert!("closed".parse::<Tab>().is_err());
        assert!(Tab::Mine.tracks_unread());
        assert!(Tab::All.tracks_unread());
        assert!(!Tab::Unassigned.tracks_unread());
        for tab in Tab::ALL {
            assert_eq!(Tab::ALL[tab.index()], tab);
        }
    }

    #[test]
    fn test_display_name_placeholder() {
        let mut record = ConversationRecord::new(ChannelIdentity::new("visitor_77123", 5));
        assert_eq!(record.display_name(), "Visitor 7123");

        record.display_name = Some("   ".to_string());
        assert_eq!(record.display_name(), "Visitor 7123");

        record.display_name = Some("Ada".to_string());
        assert_eq!(record.display_name(), "Ada");
    }

    #[test]
    fn test_absorb_live_keeps_name_and_metadata() {
        let identity = ChannelIdentity::new("c1", 1);
        let mut snapshot = ConversationRecord {
            display_name: Some("Ada".to_string()),
            last_message_text: "hi".to_string(),
            last_message_at: 100,
            unread_count: 1,
            ..ConversationRecord::new(identity.clone())
        };
        snapshot
            .metadata
            .insert("source".to_string(), serde_json::json!("web"));

        let live = ConversationRecord {
            display_name: Some("ignored".to_string()),
            last_message_text: "hello".to_string(),
            last_message_at: 150,
            unread_count: 3,
            priority: Some(Priority(2)),
            ..ConversationRecord::new(identity)
        };

        snapshot.absorb_live(&live);
        assert_eq!(snapshot.display_name.as_deref(), Some("Ada"));
        assert_eq!(snapshot.last_message_text, "hello");
        assert_eq!(snapshot.last_message_at, 150);
        assert_eq!(snapshot.unread_count, 3);
        assert_eq!(snapshot.priority, Some(Priority(2)));
        assert_eq!(snapshot.metadata.get("source"), Some(&serde_json::json!("web")));
    }
}
