//! Persistence of converted conversations
//!
//! Every conversation is written as its own pretty-printed JSON file under the
//! output directory, at the relative path recorded in its metadata. Writes go
//! through [`persistence::write_json_atomic`], so an interrupted run never
//! leaves a truncated conversation behind.
//!
//! Claude projects are written beside their conversations: a `project.json`
//! manifest and one JSON file per project document.

pub mod persistence;
pub mod projects;
pub mod sink;

pub use persistence::{read_json, write_json_atomic};
pub use projects::{ProjectsWritten, persist_project, persist_projects};
pub use sink::{ConversationSink, JsonFileSink, load_conversation};
