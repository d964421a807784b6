//! Chat Export Transformer - normalize Claude and ChatGPT conversation exports
//!
//! This library turns the bulk `conversations.json` exports of Claude and
//! ChatGPT into one JSON file per conversation plus cross-conversation
//! indexes. It supports:
//!
//! - Linearizing ChatGPT's node trees into chronologically ordered messages,
//!   tolerating missing roots, dangling references and cycles
//! - Normalizing loosely typed message content into plain text
//! - Converting whole batches on a bounded worker pool with per-record failure isolation
//! - Building per-platform, unified, topic and timeline indexes
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use chat_export_transformer::{TransformConfig, run_transform};
//!
//! let config = TransformConfig {
//!     input: PathBuf::from("raw"),
//!     output: PathBuf::from("expanded"),
//!     ..Default::default()
//! };
//! let summary = run_transform(&config)?;
//! println!("Indexed {} conversations", summary.indexed);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use error::{ItemError, ItemFailure};
pub use indexer::AggregateIndex;
pub use models::{ConversationMetadata, ConversationRecord, NormalizedMessage, Platform};
pub use parsers::{LinearizeWarning, Linearized, linearize, normalize};
pub use pipeline::{BatchOutcome, Converter, PipelineConfig, TransformConfig, process_batch, run_transform};
pub use storage::{ConversationSink, JsonFileSink};
pub use utils::paths::{format_path_with_tilde, sanitize_filename};
