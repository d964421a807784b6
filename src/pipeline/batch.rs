use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{ItemError, ItemFailure};
use crate::models::ConversationRecord;
use crate::parsers::RawRecord;
use crate::pipeline::PipelineConfig;
use crate::pipeline::convert::Converter;

/// Tally of one processed batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Raw records in the batch
    pub total: usize,
    /// Records decoded and converted, whether or not the callback succeeded
    pub converted: usize,
    /// Records the callback accepted
    pub persisted: usize,
    /// Messages across all converted records
    pub messages: usize,
    /// Structural warnings across all converted records
    pub warnings: usize,
    /// Per-record failures, ordered by batch index
    pub failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    /// Records lost to decode errors
    pub fn decode_failures(&self) -> usize {
        self.failures.iter().filter(|f| f.error.is_decode()).count()
    }
}

/// What happened to a single record
struct ItemReport {
    converted: Option<Converted>,
    failure: Option<ItemFailure>,
}

struct Converted {
    messages: usize,
    warnings: usize,
    persisted: bool,
}

/// Convert every record of a batch on a bounded worker pool
///
/// Each record is decoded and converted independently, then handed to
/// `on_record` (typically: persist, then add to the aggregate index). Message
/// order inside a conversation is preserved; the order in which records reach
/// `on_record` is not. Blocks until every record has been processed.
///
/// # Errors
///
/// Returns an error only if the worker pool cannot be created. Failures of
/// individual records are reported in [`BatchOutcome::failures`].
pub fn process_batch<F>(
    records: &[RawRecord],
    converter: &Converter,
    config: &PipelineConfig,
    on_record: F,
) -> Result<BatchOutcome>
where
    F: Fn(&ConversationRecord) -> Result<()> + Sync,
{
    let total = records.len();
    let mut outcome = BatchOutcome { total, ..Default::default() };
    if total == 0 {
        info!("No {} conversations to process", converter.platform());
        return Ok(outcome);
    }

    let workers = config.concurrency.max(1).min(total);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("convert-{}", i))
        .build()
        .context("Failed to build conversion worker pool")?;
    info!("Processing {} {} conversations on {} workers", total, converter.platform(), workers);

    let started = Instant::now();
    let finished = AtomicUsize::new(0);

    let reports: Vec<ItemReport> = pool.install(|| {
        records
            .par_iter()
            .enumerate()
            .map(|(index, raw)| {
                let item_started = Instant::now();
                let report = process_item(index, raw, converter, &on_record);

                if let Some(threshold) = config.slow_item_threshold {
                    let elapsed = item_started.elapsed();
                    if elapsed > threshold {
                        warn!(index, elapsed_ms = elapsed.as_millis() as u64, "slow conversation");
                    }
                }

                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if config.progress_interval > 0 && done % config.progress_interval == 0 && done < total {
                    info!("Progress: {}/{} conversations", done, total);
                }

                report
            })
            .collect()
    });

    // collect() keeps input order, so failures come out sorted by index
    for report in reports {
        if let Some(converted) = report.converted {
            outcome.converted += 1;
            outcome.messages += converted.messages;
            outcome.warnings += converted.warnings;
            if converted.persisted {
                outcome.persisted += 1;
            }
        }
        if let Some(failure) = report.failure {
            outcome.failures.push(failure);
        }
    }

    info!(
        "Processed {}/{} {} conversations in {:.2?} ({} converted, {} failed, {} warnings)",
        total,
        total,
        converter.platform(),
        started.elapsed(),
        outcome.converted,
        outcome.failures.len(),
        outcome.warnings
    );

    Ok(outcome)
}

fn process_item<F>(index: usize, raw: &RawRecord, converter: &Converter, on_record: &F) -> ItemReport
where
    F: Fn(&ConversationRecord) -> Result<()> + Sync,
{
    let conversion = match panic::catch_unwind(AssertUnwindSafe(|| converter.convert(raw))) {
        Ok(Ok(conversion)) => conversion,
        Ok(Err(error)) => {
            warn!(index, "Skipping conversation: {}", error);
            return ItemReport {
                converted: None,
                failure: Some(ItemFailure { index, conversation_id: None, error }),
            };
        }
        Err(payload) => {
            let error = ItemError::Panicked(panic_message(payload.as_ref()));
            warn!(index, "Skipping conversation: {}", error);
            return ItemReport {
                converted: None,
                failure: Some(ItemFailure { index, conversation_id: None, error }),
            };
        }
    };

    let id = &conversion.record.metadata.id;
    for warning in &conversion.warnings {
        warn!(conversation = %id, "{}", warning);
    }
    debug!(conversation = %id, messages = conversion.record.messages.len(), "converted");

    let callback = panic::catch_unwind(AssertUnwindSafe(|| on_record(&conversion.record)));
    let error = match callback {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(ItemError::Callback { id: id.clone(), message: format!("{:#}", e) }),
        Err(payload) => Some(ItemError::Panicked(panic_message(payload.as_ref()))),
    };
    if let Some(error) = &error {
        warn!(conversation = %id, "{}", error);
    }

    ItemReport {
        converted: Some(Converted {
            messages: conversion.record.messages.len(),
            warnings: conversion.warnings.len(),
            persisted: error.is_none(),
        }),
        failure: error.map(|error| ItemFailure { index, conversation_id: Some(id.clone()), error }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
