//! Data models for chat export transformation.
//!
//! This module defines the data structures used throughout the crate:
//!
//! - [`RawConversation`] / [`RawNode`] / [`RawMessage`] - ChatGPT tree export records
//! - [`ClaudeConversation`] / [`ClaudeMessage`] - Claude flat export records
//! - [`PartsField`] - the dynamically shaped `content.parts` field
//! - [`ClaudeProject`] / [`ClaudeDocument`] - Claude `projects.json` entries
//! - [`ConversationRecord`] - normalized conversation handed to storage and the index
//! - [`ProjectManifest`] - project metadata written beside its conversations
//! - [`IndexViews`] / [`Timeline`] - materialized aggregate index
//!
//! Raw models are decoded with serde using the lenient deserializers in
//! `parsers::deserializers` (timestamps, `null` treated as missing).

pub mod conversation;
pub mod index;
pub mod project;
pub mod raw;

pub use conversation::{
    ConversationMetadata, ConversationRecord, EMPTY_MESSAGE_SENTINEL, NormalizedMessage, Platform,
    resolve_title, synthesize_title,
};
pub use index::{
    ConversationIndexFile, DateRange, IndexViews, Timeline, TimelineFile, TopicIndexFile,
};
pub use project::{ProjectDocumentEntry, ProjectManifest};
pub use raw::{
    ClaudeAttachment, ClaudeContent, ClaudeConversation, ClaudeDocument, ClaudeMessage, ClaudeProject,
    PartsField, RawAuthor, RawContent, RawConversation, RawMessage, RawNode, Role,
};
