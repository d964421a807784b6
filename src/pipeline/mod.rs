//! Bounded-concurrency conversion of export batches
//!
//! # Error Handling Strategy
//!
//! - **Record isolation**: Each raw record is decoded, converted and handed to the
//!   callback on its own. Decode errors, callback errors and panics are collected
//!   as [`ItemFailure`](crate::error::ItemFailure)s and never stop the batch.
//!
//! - **Structural warnings**: Linearization anomalies are logged at `warn` with the
//!   conversation id and counted in [`BatchOutcome::warnings`].
//!
//! - **Batch-level errors**: Only failing to build the worker pool (in
//!   [`process_batch`]) or to read/write whole files (in [`run::run_transform`])
//!   return an error.

use std::time::Duration;

pub mod batch;
pub mod convert;
pub mod run;

pub use batch::{BatchOutcome, process_batch};
pub use convert::{Conversion, Converter};
pub use run::{PlatformReport, RunSummary, TransformConfig, run_transform};

/// Default number of worker threads
pub const DEFAULT_CONCURRENCY: usize = 25;

/// Default number of finished items between progress log lines
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Worker threads; clamped to at least 1 and at most the batch size
    pub concurrency: usize,
    /// Log progress every this many finished items (0 disables interim lines)
    pub progress_interval: usize,
    /// Items taking longer than this are logged as slow
    pub slow_item_threshold: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            slow_item_threshold: None,
        }
    }
}
