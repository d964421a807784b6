//! Index files written once the pipeline has drained
//!
//! Layout under the output directory:
//! - `<platform>/index/conversations_index.json` for each platform
//! - `unified/conversations_index.json`
//! - `unified/topics_index.json`
//! - `unified/timeline.json`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use crate::models::{
    ConversationIndexFile, ConversationMetadata, IndexViews, Platform, TimelineFile,
    TopicIndexFile,
};
use crate::storage::{read_json, write_json_atomic};

const INDEX_FILENAME: &str = "conversations_index.json";
const TOPICS_FILENAME: &str = "topics_index.json";
const TIMELINE_FILENAME: &str = "timeline.json";
const UNIFIED_DIR: &str = "unified";

pub fn platform_index_path(output_dir: &Path, platform: Platform) -> PathBuf {
    output_dir.join(platform.as_str()).join("index").join(INDEX_FILENAME)
}

pub fn unified_index_path(output_dir: &Path) -> PathBuf {
    output_dir.join(UNIFIED_DIR).join(INDEX_FILENAME)
}

pub fn topics_index_path(output_dir: &Path) -> PathBuf {
    output_dir.join(UNIFIED_DIR).join(TOPICS_FILENAME)
}

pub fn timeline_path(output_dir: &Path) -> PathBuf {
    output_dir.join(UNIFIED_DIR).join(TIMELINE_FILENAME)
}

/// Write every index view to disk
///
/// A platform with no conversations still gets an (empty) index file, so
/// readers can tell "nothing exported" from "not transformed yet".
///
/// # Errors
///
/// Returns an error if any index file cannot be written. Files written
/// before the failure are left in place.
pub fn write_indexes(output_dir: &Path, views: &IndexViews) -> Result<()> {
    let last_updated = Utc::now();

    for platform in Platform::ALL {
        let path = platform_index_path(output_dir, platform);
        let file = ConversationIndexFile {
            conversations: views.platform(platform).to_vec(),
            last_updated,
        };
        write_json_atomic(&path, &file)
            .with_context(|| format!("Failed to write {} index", platform))?;
        debug!(path = %path.display(), count = file.conversations.len(), "wrote platform index");
    }

    let unified = ConversationIndexFile { conversations: views.unified.clone(), last_updated };
    write_json_atomic(&unified_index_path(output_dir), &unified)
        .context("Failed to write unified index")?;

    let topics = TopicIndexFile { topics: views.topics.clone(), last_updated };
    write_json_atomic(&topics_index_path(output_dir), &topics)
        .context("Failed to write topics index")?;

    let timeline = TimelineFile { timeline: views.timeline.clone(), last_updated };
    write_json_atomic(&timeline_path(output_dir), &timeline)
        .context("Failed to write timeline")?;

    Ok(())
}

/// Conversations listed in `unified/conversations_index.json`
pub fn load_unified_index(output_dir: &Path) -> Result<Vec<ConversationMetadata>> {
    let path = unified_index_path(output_dir);
    let file: ConversationIndexFile = read_json(&path)
        .with_context(|| format!("No unified index at {}; run `transform` first", path.display()))?;
    Ok(file.conversations)
}

pub fn load_topics_index(output_dir: &Path) -> Result<TopicIndexFile> {
    read_json(&topics_index_path(output_dir))
}

pub fn load_timeline(output_dir: &Path) -> Result<TimelineFile> {
    read_json(&timeline_path(output_dir))
}
