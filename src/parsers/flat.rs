//! Conversion of Claude exports, whose messages are already an ordered list

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::models::{ClaudeContent, ClaudeMessage, EMPTY_MESSAGE_SENTINEL, NormalizedMessage, Platform};
use crate::parsers::content::join_fragments;
use crate::parsers::topics::contains_code;
use crate::parsers::tree::Linearized;

/// Normalize a Claude message list, keeping export order
///
/// Content blocks are flattened the same way tree messages are: fragments
/// joined by single spaces, empty results replaced by the sentinel. Messages
/// without content blocks fall back to their plain `text` field.
pub fn convert_messages(messages: &[ClaudeMessage]) -> Linearized {
    let mut result = Linearized::default();
    let mut participants = BTreeSet::new();

    for (position, message) in messages.iter().enumerate() {
        let mut fragments = Vec::with_capacity(message.content.len().max(1));
        for block in &message.content {
            if block.content_type == "image" {
                result.has_media = true;
            }
            if let Some(fragment) = block_fragment(block) {
                fragments.push(fragment);
            }
        }
        if fragments.is_empty() && !message.text.is_empty() {
            fragments.push(message.text.clone());
        }

        let mut content = join_fragments(&fragments);
        if content.is_empty() {
            content = EMPTY_MESSAGE_SENTINEL.to_string();
        }
        result.has_code |= contains_code(&content);

        let mut metadata = Map::new();
        let attached: Vec<Value> = message
            .files
            .iter()
            .chain(&message.attachments)
            .filter_map(|file| file.file_name.clone())
            .map(Value::String)
            .collect();
        if !message.files.is_empty() || !message.attachments.is_empty() {
            result.has_media = true;
            metadata.insert("files".to_string(), Value::Array(attached));
        }

        let author = message.sender.canonical_label(Platform::Claude).to_string();
        participants.insert(author.clone());

        result.messages.push(NormalizedMessage {
            id: message
                .uuid
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("message-{}", position)),
            author,
            content,
            timestamp: message.created_at,
            metadata,
        });
    }

    result.participants = participants.into_iter().collect();
    result
}

fn block_fragment(block: &ClaudeContent) -> Option<String> {
    match block.content_type.as_str() {
        "text" => block.text.clone(),
        "image" => Some(format!("[Image: {}]", block.url.as_deref().unwrap_or_default())),
        "tool_use" => Some(format!("[Tool use: {}]", block.name.as_deref().unwrap_or("unknown"))),
        "tool_result" => Some("[Tool result]".to_string()),
        other => match &block.text {
            Some(text) => Some(text.clone()),
            None if other.is_empty() => None,
            None => Some(format!("[Object: {}]", other)),
        },
    }
}
