//! Parsers for Claude and ChatGPT conversation exports
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach:
//!
//! - **Batch-level failures**: An unreadable `conversations.json`, or one that is not a JSON
//!   array, is the only hard error ([`export::load_batch`]). It aborts the run.
//!
//! - **Record-level failures**: Records are kept as raw JSON until a pipeline worker decodes
//!   them, so one malformed conversation never affects its siblings.
//!
//! - **Structural anomalies**: Missing roots, cycles, dangling parents or children and
//!   undecodable messages inside a tree are never errors. [`tree::linearize`] degrades
//!   gracefully and reports them as [`tree::LinearizeWarning`]s.
//!
//! - **Project exports**: A missing or malformed `projects.json` only logs a warning
//!   ([`export::load_project_records`]); conversations are then written without a project.
//!
//! - **Content-shape anomalies**: Unexpected `content.parts` shapes degrade to placeholder text
//!   in [`content::normalize`].

pub mod content;
pub mod deserializers;
pub mod export;
pub mod flat;
pub mod topics;
pub mod tree;

pub use content::normalize;
pub use export::{
    ExportSources, RawRecord, discover_exports, load_batch, load_project_records, load_projects,
    parse_batch, project_names,
};
pub use flat::convert_messages;
pub use topics::extract_topics;
pub use tree::{LinearizeWarning, Linearized, linearize};
