use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Substituted for message content that is empty after normalization
pub const EMPTY_MESSAGE_SENTINEL: &str = "[Empty message]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Claude,
    ChatGpt,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Claude, Platform::ChatGpt];

    /// Directory name and serialized tag
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Claude => "claude",
            Platform::ChatGpt => "chatgpt",
        }
    }

    pub fn assistant_label(self) -> &'static str {
        match self {
            Platform::Claude => "Claude",
            Platform::ChatGpt => "ChatGPT",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    pub id: String,
    pub title: String,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    pub message_count: usize,
    pub participants: Vec<String>,
    pub topics: Vec<String>,
    pub has_code: bool,
    pub has_media: bool,
    /// Relative to the output directory
    pub file_path: PathBuf,
}

/// A fully converted conversation, immutable once the pipeline builds it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub metadata: ConversationMetadata,
    pub messages: Vec<NormalizedMessage>,
}

/// Title used when the export has none: `Conversation-<first 8 chars of id>`
pub fn synthesize_title(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    if prefix.is_empty() {
        "Conversation-untitled".to_string()
    } else {
        format!("Conversation-{}", prefix)
    }
}

/// Keep the exported title unless it is blank
pub fn resolve_title(title: &str, id: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() { synthesize_title(id) } else { trimmed.to_string() }
}
