use thiserror::Error;

/// Why a single record of a batch failed
///
/// None of these stop the batch; they are collected into
/// [`BatchOutcome::failures`](crate::pipeline::BatchOutcome::failures).
#[derive(Debug, Error)]
pub enum ItemError {
    /// The raw record is not a conversation of the expected format
    #[error("failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),

    /// Decoded, but carries no conversation id
    #[error("record has no conversation id")]
    MissingId,

    /// Converted, but persisting or indexing it failed
    #[error("callback failed for conversation {id}: {message}")]
    Callback { id: String, message: String },

    /// Conversion or the callback panicked
    #[error("panicked while processing record: {0}")]
    Panicked(String),
}

impl ItemError {
    pub fn is_decode(&self) -> bool {
        matches!(self, ItemError::Decode(_) | ItemError::MissingId)
    }
}

/// Failure of one record, by its position in the batch
#[derive(Debug)]
pub struct ItemFailure {
    pub index: usize,
    /// Known once the record decoded
    pub conversation_id: Option<String>,
    pub error: ItemError,
}
