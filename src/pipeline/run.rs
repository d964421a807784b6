//! A full transform run: discover exports, convert each platform's batch,
//! persist conversations and Claude projects, and write the aggregate indexes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ItemFailure;
use crate::indexer::{AggregateIndex, write_indexes};
use crate::models::{ClaudeProject, ConversationRecord, Platform};
use crate::parsers::{ExportSources, discover_exports, load_batch, load_project_records, project_names};
use crate::pipeline::batch::{BatchOutcome, process_batch};
use crate::pipeline::convert::Converter;
use crate::pipeline::PipelineConfig;
use crate::storage::{ConversationSink, JsonFileSink, ProjectsWritten, persist_projects, write_json_atomic};
use crate::utils::format_path_with_tilde;

pub const REPORT_FILENAME: &str = "transformation_report.json";

#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Folder holding the `claude*` / `chat-gpt*` export directories
    pub input: PathBuf,
    pub output: PathBuf,
    /// Platforms to transform, in order
    pub platforms: Vec<Platform>,
    pub pipeline: PipelineConfig,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("raw"),
            output: PathBuf::from("expanded"),
            platforms: Platform::ALL.to_vec(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// One failed record, as written to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub error: String,
}

impl From<&ItemFailure> for FailureReport {
    fn from(failure: &ItemFailure) -> Self {
        Self {
            index: failure.index,
            conversation_id: failure.conversation_id.clone(),
            error: failure.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformReport {
    pub platform: Platform,
    pub source: PathBuf,
    pub total: usize,
    pub converted: usize,
    pub persisted: usize,
    pub messages: usize,
    pub warnings: usize,
    pub failures: Vec<FailureReport>,
    /// Claude projects written with a `project.json`
    #[serde(default)]
    pub projects: usize,
    /// Claude project documents written
    #[serde(default)]
    pub documents: usize,
}

impl PlatformReport {
    fn new(platform: Platform, source: &Path, outcome: &BatchOutcome, written: ProjectsWritten) -> Self {
        Self {
            platform,
            source: source.to_path_buf(),
            total: outcome.total,
            converted: outcome.converted,
            persisted: outcome.persisted,
            messages: outcome.messages,
            warnings: outcome.warnings,
            failures: outcome.failures.iter().map(FailureReport::from).collect(),
            projects: written.projects,
            documents: written.documents,
        }
    }
}

/// Contents of `transformation_report.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub platforms: Vec<PlatformReport>,
    /// Conversations present in the written indexes
    pub indexed: usize,
}

impl RunSummary {
    pub fn platform(&self, platform: Platform) -> Option<&PlatformReport> {
        self.platforms.iter().find(|report| report.platform == platform)
    }

    pub fn total_failures(&self) -> usize {
        self.platforms.iter().map(|report| report.failures.len()).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.platforms.iter().map(|report| report.warnings).sum()
    }
}

/// Persist a converted conversation, then add it to the index
///
/// A conversation that could not be written is not indexed, so the index
/// never points at a missing file.
pub fn persist_and_index<S>(sink: &S, index: &AggregateIndex, record: &ConversationRecord) -> Result<()>
where
    S: ConversationSink + ?Sized,
{
    sink.persist(record)?;
    index.record(record.metadata.clone());
    Ok(())
}

/// Run a whole transform
///
/// # Errors
///
/// Returns an error if:
/// - the input folder is missing, or holds no export for any selected platform
/// - a discovered `conversations.json` cannot be read or is not a JSON array
/// - the worker pool cannot be created
/// - the index files or the report cannot be written
///
/// Failures of individual conversations are reported in the summary and do
/// not fail the run.
pub fn run_transform(config: &TransformConfig) -> Result<RunSummary> {
    let started = Instant::now();
    let sources = discover_exports(&config.input)?;

    let mut batches = Vec::new();
    for &platform in &config.platforms {
        match conversations_path(&sources, platform) {
            Some(path) => batches.push((platform, path)),
            None => warn!(
                "No {} export found under {}",
                platform,
                format_path_with_tilde(&config.input)
            ),
        }
    }
    if batches.is_empty() {
        bail!(
            "No export directories found under {} (expected claude*/ or chat-gpt*/ folders containing conversations.json)",
            config.input.display()
        );
    }

    fs::create_dir_all(&config.output)
        .with_context(|| format!("Failed to create output folder: {}", config.output.display()))?;

    let sink = JsonFileSink::new(&config.output);
    let index = AggregateIndex::new();
    let mut reports = Vec::new();

    for (platform, path) in batches {
        let records = load_batch(&path)?;
        let (converter, written) = match platform {
            Platform::ChatGpt => (Converter::ChatGpt, ProjectsWritten::default()),
            Platform::Claude => {
                let projects = claude_projects(&sources);
                let written = persist_projects(&config.output, &projects);
                if written.projects > 0 {
                    info!("Wrote {} Claude projects with {} documents", written.projects, written.documents);
                }
                (Converter::Claude { projects: project_names(&projects) }, written)
            }
        };
        let outcome = process_batch(&records, &converter, &config.pipeline, |record| {
            persist_and_index(&sink, &index, record)
        })?;
        reports.push(PlatformReport::new(platform, &path, &outcome, written));
    }

    write_indexes(&config.output, &index.materialize())?;

    let summary = RunSummary {
        generated_at: Utc::now(),
        duration_secs: started.elapsed().as_secs_f64(),
        platforms: reports,
        indexed: index.len(),
    };
    write_json_atomic(&config.output.join(REPORT_FILENAME), &summary)
        .context("Failed to write transformation report")?;

    info!(
        "Transformed {} conversations into {} ({} failed, {} warnings) in {:.2}s",
        summary.indexed,
        format_path_with_tilde(&config.output),
        summary.total_failures(),
        summary.total_warnings(),
        summary.duration_secs
    );

    Ok(summary)
}

fn conversations_path(sources: &ExportSources, platform: Platform) -> Option<PathBuf> {
    match platform {
        Platform::Claude => sources.claude_conversations(),
        Platform::ChatGpt => sources.chatgpt_conversations(),
    }
}

fn claude_projects(sources: &ExportSources) -> Vec<ClaudeProject> {
    sources
        .claude_projects()
        .filter(|path| path.is_file())
        .map(|path| load_project_records(&path))
        .unwrap_or_default()
}
