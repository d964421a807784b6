//! Cross-conversation indexes
//!
//! # Error Handling Strategy
//!
//! - **Recording never fails**: [`AggregateIndex::record`] is infallible and safe to
//!   call from any number of workers. A poisoned lock is recovered rather than
//!   propagated, since every mutation is a single append.
//!
//! - **Writing is batch-level**: [`write_indexes`] runs once after the pipeline has
//!   drained. Any I/O failure there aborts the run with context naming the index file.

pub mod aggregate;
pub mod persistence;

pub use aggregate::AggregateIndex;
pub use persistence::{load_unified_index, write_indexes};
