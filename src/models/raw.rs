//! Export-side records, decoded as loosely as the exports are written.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::models::Platform;

/// Author role shared by both export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "human")]
    User,
    Assistant,
    System,
    Tool,
    #[default]
    #[serde(other)]
    Other,
}

impl Role {
    /// Canonical author label written into normalized messages
    pub fn canonical_label(self, platform: Platform) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => platform.assistant_label(),
            Role::System => "System",
            Role::Tool => "Tool",
            Role::Other => "Other",
        }
    }
}

/// The `content.parts` field as it appears on the wire
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PartsField {
    Text(String),
    Texts(Vec<String>),
    Mixed(Vec<Value>),
    Other(Value),
}

/// One ChatGPT conversation, a tree of nodes keyed by node id
#[derive(Debug, Clone, Deserialize)]
pub struct RawConversation {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub mapping: IndexMap<String, RawNode>,
    #[serde(default)]
    pub current_node: Option<String>,
}

impl RawConversation {
    /// The conversation id, falling back to `conversation_id`
    pub fn resolved_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.conversation_id.as_deref())
    }
}

/// A node of the conversation tree
///
/// The message stays undecoded so a malformed or too deeply nested message
/// cannot take the node (and the children it anchors) down with it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub children: Vec<String>,
    #[serde(default)]
    pub message: Option<Box<RawValue>>,
}

impl RawNode {
    /// Parent id, with an empty string treated as no parent
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub author: RawAuthor,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub content: RawContent,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub parts: Option<PartsField>,
    /// Set instead of `parts` by code and execution-output content
    #[serde(default)]
    pub text: Option<String>,
}

/// One Claude conversation, messages already in order
#[derive(Debug, Clone, Deserialize)]
pub struct ClaudeConversation {
    pub uuid: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_uuid: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub chat_messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeMessage {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub text: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub sender: Role,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub content: Vec<ClaudeContent>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub attachments: Vec<ClaudeAttachment>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub files: Vec<ClaudeAttachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeContent {
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeAttachment {
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Entry of a Claude `projects.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeProject {
    pub uuid: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub docs: Vec<ClaudeDocument>,
}

/// A knowledge document attached to a Claude project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaudeDocument {
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub content: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}
