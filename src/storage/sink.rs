use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::ConversationRecord;
use crate::storage::persistence::{read_json, write_json_atomic};

/// Destination for converted conversations
///
/// Called from pipeline workers, so implementations must be shareable across
/// threads.
pub trait ConversationSink: Sync {
    fn persist(&self, record: &ConversationRecord) -> Result<()>;
}

/// Writes each conversation to `<output_dir>/<metadata.file_path>`
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Absolute location a record is written to
    pub fn path_for(&self, record: &ConversationRecord) -> PathBuf {
        self.output_dir.join(&record.metadata.file_path)
    }
}

impl ConversationSink for JsonFileSink {
    fn persist(&self, record: &ConversationRecord) -> Result<()> {
        write_json_atomic(&self.path_for(record), record)
    }
}

/// Read back a conversation written by [`JsonFileSink`]
pub fn load_conversation(path: &Path) -> Result<ConversationRecord> {
    read_json(path)
}
