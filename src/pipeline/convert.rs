use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::ItemError;
use crate::models::{
    ClaudeConversation, ConversationMetadata, ConversationRecord, Platform, RawConversation,
    resolve_title,
};
use crate::parsers::{LinearizeWarning, Linearized, RawRecord, convert_messages, extract_topics, linearize};
use crate::utils::conversation_relative_path;

/// How raw records of a batch are decoded and converted
#[derive(Debug, Clone)]
pub enum Converter {
    /// ChatGPT `conversations.json`: node trees, linearized
    ChatGpt,
    /// Claude `conversations.json`: flat message lists
    Claude {
        /// Project id -> project name
        projects: HashMap<String, String>,
    },
}

/// A converted conversation plus the anomalies met while linearizing it
#[derive(Debug, Clone)]
pub struct Conversion {
    pub record: ConversationRecord,
    pub warnings: Vec<LinearizeWarning>,
}

impl Converter {
    pub fn platform(&self) -> Platform {
        match self {
            Converter::ChatGpt => Platform::ChatGpt,
            Converter::Claude { .. } => Platform::Claude,
        }
    }

    /// Decode and convert one raw record
    ///
    /// # Errors
    ///
    /// [`ItemError::Decode`] when the record does not match the platform's
    /// format, [`ItemError::MissingId`] when it has no conversation id. Nothing
    /// else about a record's contents is an error.
    pub fn convert(&self, raw: &RawRecord) -> Result<Conversion, ItemError> {
        match self {
            Converter::ChatGpt => convert_chatgpt(raw),
            Converter::Claude { projects } => convert_claude(raw, projects),
        }
    }
}

fn convert_chatgpt(raw: &RawRecord) -> Result<Conversion, ItemError> {
    let conversation: RawConversation = serde_json::from_str(raw.get())?;
    let id = conversation
        .resolved_id()
        .filter(|id| !id.is_empty())
        .ok_or(ItemError::MissingId)?
        .to_string();

    let linearized =
        linearize(&conversation.mapping, conversation.current_node.as_deref(), Platform::ChatGpt);

    Ok(assemble(
        Header {
            id,
            title: &conversation.title,
            platform: Platform::ChatGpt,
            project: None,
            created: conversation.create_time,
            modified: conversation.update_time,
        },
        linearized,
    ))
}

fn convert_claude(
    raw: &RawRecord,
    projects: &HashMap<String, String>,
) -> Result<Conversion, ItemError> {
    let conversation: ClaudeConversation = serde_json::from_str(raw.get())?;
    if conversation.uuid.is_empty() {
        return Err(ItemError::MissingId);
    }

    let project = conversation
        .project_uuid
        .as_ref()
        .and_then(|uuid| projects.get(uuid))
        .filter(|name| !name.trim().is_empty())
        .cloned();
    let linearized = convert_messages(&conversation.chat_messages);

    Ok(assemble(
        Header {
            id: conversation.uuid.clone(),
            title: &conversation.name,
            platform: Platform::Claude,
            project,
            created: conversation.created_at,
            modified: conversation.updated_at,
        },
        linearized,
    ))
}

/// Conversation-level fields common to both formats
struct Header<'a> {
    id: String,
    title: &'a str,
    platform: Platform,
    project: Option<String>,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
}

fn assemble(header: Header<'_>, linearized: Linearized) -> Conversion {
    let title = resolve_title(header.title, &header.id);
    let topics = extract_topics(&title);

    let mut metadata = ConversationMetadata {
        id: header.id,
        title,
        platform: header.platform,
        project: header.project,
        created_date: header.created,
        last_modified: header.modified,
        message_count: linearized.messages.len(),
        participants: linearized.participants,
        topics,
        has_code: linearized.has_code,
        has_media: linearized.has_media,
        file_path: Default::default(),
    };
    metadata.file_path = conversation_relative_path(&metadata);

    Conversion {
        record: ConversationRecord { metadata, messages: linearized.messages },
        warnings: linearized.warnings,
    }
}
