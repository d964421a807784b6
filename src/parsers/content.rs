//! Content normalization for the loosely typed `content.parts` field.
//!
//! Exports write `parts` as a bare string, a list of strings, or a list mixing
//! strings with objects (image pointers, audio transcripts, ...). Everything is
//! resolved here into an ordered list of text fragments so the rest of the
//! crate only sees `Vec<String>`. No input shape is an error.

use serde_json::{Map, Value};

use crate::models::{PartsField, RawContent};

/// Object fields checked, in order, for text inside a mixed part
const TEXT_FIELDS: [&str; 1] = ["text"];

/// Object fields marking a part as a pointer to an uploaded or generated file
const MEDIA_POINTER_FIELDS: [&str; 2] = ["asset_pointer", "audio_asset_pointer"];

/// Normalize a `parts` field into ordered text fragments
///
/// - single string: one fragment
/// - list of strings: returned unchanged
/// - mixed list: strings pass through, objects contribute their `text` field
///   or an `[Object: ...]` placeholder, other scalars their JSON text
/// - anything else: one fragment from its JSON text
/// - absent or `null`: no fragments
pub fn normalize(parts: Option<&PartsField>) -> Vec<String> {
    match parts {
        None => Vec::new(),
        Some(PartsField::Text(text)) => vec![text.clone()],
        Some(PartsField::Texts(texts)) => texts.clone(),
        Some(PartsField::Mixed(values)) => values.iter().map(normalize_part).collect(),
        Some(PartsField::Other(value)) => vec![normalize_part(value)],
    }
}

/// Fragments for a whole message content block
///
/// Code and execution-output content carries a `text` field instead of
/// `parts`; it is used only when `parts` is absent.
pub fn content_fragments(content: &RawContent) -> Vec<String> {
    match (&content.parts, &content.text) {
        (Some(parts), _) => normalize(Some(parts)),
        (None, Some(text)) => vec![text.clone()],
        (None, None) => Vec::new(),
    }
}

/// Join fragments with single spaces and trim the result
pub fn join_fragments(fragments: &[String]) -> String {
    fragments.join(" ").trim().to_string()
}

/// Whether any object part points at an image, audio clip or uploaded file
pub fn contains_media(parts: Option<&PartsField>) -> bool {
    let is_media = |value: &Value| {
        value.as_object().is_some_and(|obj| MEDIA_POINTER_FIELDS.iter().any(|f| obj.contains_key(*f)))
    };
    match parts {
        Some(PartsField::Mixed(values)) => values.iter().any(is_media),
        Some(PartsField::Other(value)) => is_media(value),
        _ => false,
    }
}

fn normalize_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => object_text(obj).unwrap_or_else(|| object_placeholder(obj)),
        other => other.to_string(),
    }
}

fn object_text(obj: &Map<String, Value>) -> Option<String> {
    TEXT_FIELDS.iter().find_map(|field| obj.get(*field).and_then(Value::as_str)).map(str::to_string)
}

/// `[Object: <content_type> <pointer>]` when the part names its type (the
/// pointer only for media parts), else its compact JSON
fn object_placeholder(obj: &Map<String, Value>) -> String {
    let Some(content_type) = obj.get("content_type").and_then(Value::as_str) else {
        return format!("[Object: {}]", Value::Object(obj.clone()));
    };
    let pointer = MEDIA_POINTER_FIELDS
        .iter()
        .find_map(|field| obj.get(*field).and_then(Value::as_str))
        .filter(|p| !p.is_empty());
    match pointer {
        Some(pointer) => format!("[Object: {} {}]", content_type, pointer),
        None => format!("[Object: {}]", content_type),
    }
}
