use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ConversationMetadata, Platform};

/// Earliest and latest creation date among dated conversations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub conversations: Vec<ConversationMetadata>,
    pub total_count: usize,
    /// Absent when no conversation carries a creation date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Read-only snapshot of the aggregate index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexViews {
    pub platforms: BTreeMap<Platform, Vec<ConversationMetadata>>,
    /// Every conversation, in the order workers finished them
    pub unified: Vec<ConversationMetadata>,
    pub topics: BTreeMap<String, Vec<String>>,
    pub timeline: Timeline,
}

impl IndexViews {
    /// Listing for one platform, empty when nothing was recorded for it
    pub fn platform(&self, platform: Platform) -> &[ConversationMetadata] {
        self.platforms.get(&platform).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// On-disk shape of `conversations_index.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationIndexFile {
    pub conversations: Vec<ConversationMetadata>,
    pub last_updated: DateTime<Utc>,
}

/// On-disk shape of `topics_index.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicIndexFile {
    pub topics: BTreeMap<String, Vec<String>>,
    pub last_updated: DateTime<Utc>,
}

/// On-disk shape of `timeline.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineFile {
    #[serde(flatten)]
    pub timeline: Timeline,
    pub last_updated: DateTime<Utc>,
}
