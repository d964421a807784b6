use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::value::RawValue;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::ClaudeProject;
use crate::utils::validate_file_size;

/// One undecoded conversation from an export batch
pub type RawRecord = Box<RawValue>;

const CONVERSATIONS_FILENAME: &str = "conversations.json";
const PROJECTS_FILENAME: &str = "projects.json";

/// How deep below the input folder export directories are searched for
const MAX_DISCOVERY_DEPTH: usize = 2;

/// Export directories found in an input folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSources {
    pub claude: Option<PathBuf>,
    pub chatgpt: Option<PathBuf>,
}

impl ExportSources {
    pub fn claude_conversations(&self) -> Option<PathBuf> {
        self.claude.as_ref().map(|dir| dir.join(CONVERSATIONS_FILENAME))
    }

    pub fn claude_projects(&self) -> Option<PathBuf> {
        self.claude.as_ref().map(|dir| dir.join(PROJECTS_FILENAME))
    }

    pub fn chatgpt_conversations(&self) -> Option<PathBuf> {
        self.chatgpt.as_ref().map(|dir| dir.join(CONVERSATIONS_FILENAME))
    }
}

/// Find Claude and ChatGPT export directories under `input_dir`
///
/// An export directory is any directory holding a `conversations.json`
/// whose name starts with `claude` (Claude) or `chat-gpt`/`chatgpt` (ChatGPT).
/// Exports are usually suffixed with their export date, so when several
/// match the lexicographically last one wins. The input folder itself counts
/// when its own name matches.
///
/// # Errors
///
/// Returns an error if `input_dir` does not exist or is not a directory.
pub fn discover_exports(input_dir: &Path) -> Result<ExportSources> {
    let metadata = fs::metadata(input_dir)
        .with_context(|| format!("Input folder does not exist: {}", input_dir.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", input_dir.display());
    }

    let mut sources = ExportSources::default();

    for entry in WalkDir::new(input_dir).max_depth(MAX_DISCOVERY_DEPTH).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path during export discovery: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_dir() || !entry.path().join(CONVERSATIONS_FILENAME).is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_lowercase();
        let slot = if name.starts_with("claude") {
            &mut sources.claude
        } else if name.starts_with("chat-gpt") || name.starts_with("chatgpt") {
            &mut sources.chatgpt
        } else {
            debug!("Ignoring unrecognized export directory {}", entry.path().display());
            continue;
        };

        // Sorted walk: a later match is a later export
        *slot = Some(entry.path().to_path_buf());
    }

    Ok(sources)
}

/// Read a `conversations.json` array without decoding its records
///
/// Each element stays raw so a malformed conversation only fails itself
/// later in the pipeline.
///
/// # Errors
///
/// Returns an error if the file cannot be read, exceeds the size limit, or is
/// not a JSON array. This is the batch-level failure that aborts a run.
pub fn load_batch(path: &Path) -> Result<Vec<RawRecord>> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open conversations file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut text = String::new();
    file.read_to_string(&mut text)
        .with_context(|| format!("Failed to read conversations file: {}", path.display()))?;

    let records = parse_batch(&text)
        .with_context(|| format!("Failed to parse conversations file: {}", path.display()))?;
    info!("Loaded {} conversations from {}", records.len(), path.display());

    Ok(records)
}

/// Split a JSON array into raw records
pub fn parse_batch(text: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(text).context("conversations file must be a JSON array")
}

/// Load the Claude project id -> project name lookup
///
/// A missing or unreadable `projects.json` is not fatal: the lookup is
/// simply empty and conversations are written without a project.
pub fn load_projects(path: &Path) -> HashMap<String, String> {
    project_names(&load_project_records(path))
}

/// Load every entry of a Claude `projects.json`, documents included
///
/// Like [`load_projects`], a file that cannot be read or parsed yields no
/// projects and a warning.
pub fn load_project_records(path: &Path) -> Vec<ClaudeProject> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read Claude projects {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<ClaudeProject>>(&text) {
        Ok(projects) => {
            info!("Loaded {} Claude projects", projects.len());
            projects
        }
        Err(e) => {
            warn!("Failed to parse Claude projects {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Project id -> project name
pub fn project_names(projects: &[ClaudeProject]) -> HashMap<String, String> {
    projects.iter().map(|p| (p.uuid.clone(), p.name.clone())).collect()
}
