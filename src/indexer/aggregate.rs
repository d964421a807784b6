//! Aggregate index built incrementally while a batch is processed.
//!
//! Workers call [`AggregateIndex::record`] concurrently as conversations
//! finish; once the pipeline has drained, [`AggregateIndex::materialize`]
//! produces the platform listings, topic groupings and timeline. The listing
//! and topic map are the only state shared between workers, both behind one
//! `RwLock`. A poisoned lock is recovered: every mutation is a plain append,
//! so a panicking writer cannot leave the state half-updated.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{ConversationMetadata, DateRange, IndexViews, Timeline};

#[derive(Debug, Default)]
struct IndexState {
    conversations: Vec<ConversationMetadata>,
    topics: BTreeMap<String, Vec<String>>,
}

/// Cross-conversation index, created once per run and shared by reference
#[derive(Debug, Default)]
pub struct AggregateIndex {
    state: RwLock<IndexState>,
}

impl AggregateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one conversation to the master listing and its topic buckets
    pub fn record(&self, metadata: ConversationMetadata) {
        let mut state = self.write();
        for topic in &metadata.topics {
            state.topics.entry(topic.clone()).or_default().push(metadata.id.clone());
        }
        state.conversations.push(metadata);
    }

    /// Number of conversations recorded so far
    pub fn len(&self) -> usize {
        self.read().conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the index into its output views
    ///
    /// The timeline is sorted by creation date (undated first, ties by id) so
    /// it does not depend on the order workers finished in.
    pub fn materialize(&self) -> IndexViews {
        let state = self.read();

        let mut platforms: BTreeMap<_, Vec<ConversationMetadata>> = BTreeMap::new();
        for conversation in &state.conversations {
            platforms.entry(conversation.platform).or_default().push(conversation.clone());
        }

        let mut sorted = state.conversations.clone();
        sorted.sort_by(|a, b| a.created_date.cmp(&b.created_date).then_with(|| a.id.cmp(&b.id)));

        let date_range = date_range(&sorted);
        let timeline = Timeline { total_count: sorted.len(), conversations: sorted, date_range };

        IndexViews {
            platforms,
            unified: state.conversations.clone(),
            topics: state.topics.clone(),
            timeline,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Range over dated conversations of a creation-sorted listing
fn date_range(sorted: &[ConversationMetadata]) -> Option<DateRange> {
    let earliest = sorted.iter().find_map(|c| c.created_date)?;
    let latest = sorted.iter().rev().find_map(|c| c.created_date)?;
    Some(DateRange { earliest, latest })
}
