//! Claude project metadata as written next to the project's conversations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contents of `claude/projects/<project>/project.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Documents that were written, in export order
    #[serde(default)]
    pub documents: Vec<ProjectDocumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDocumentEntry {
    pub uuid: String,
    pub filename: String,
    /// Relative to the output directory
    pub file_path: PathBuf,
}
