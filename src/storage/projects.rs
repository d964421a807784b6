use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::{ClaudeProject, ProjectDocumentEntry, ProjectManifest};
use crate::storage::persistence::write_json_atomic;
use crate::utils::{project_document_path, project_manifest_path};

/// Counts of project artifacts written by [`persist_projects`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectsWritten {
    pub projects: usize,
    pub documents: usize,
}

/// Write one project's documents, then its `project.json`
///
/// A document that cannot be written is skipped with a warning and left out
/// of the manifest.
///
/// # Errors
///
/// Returns an error if the manifest cannot be written.
pub fn persist_project(output_dir: &Path, project: &ClaudeProject) -> Result<ProjectManifest> {
    let mut documents = Vec::with_capacity(project.docs.len());
    for document in &project.docs {
        let file_path = project_document_path(&project.name, document);
        match write_json_atomic(&output_dir.join(&file_path), document) {
            Ok(()) => documents.push(ProjectDocumentEntry {
                uuid: document.uuid.clone(),
                filename: document.filename.clone(),
                file_path,
            }),
            Err(e) => warn!("Failed to write document {} of project {}: {:#}", document.filename, project.uuid, e),
        }
    }

    let manifest = ProjectManifest {
        uuid: project.uuid.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
        created_at: project.created_at,
        updated_at: project.updated_at,
        documents,
    };
    write_json_atomic(&output_dir.join(project_manifest_path(&project.name)), &manifest)
        .with_context(|| format!("Failed to write project {}", project.uuid))?;
    debug!("Wrote project {} with {} documents", project.uuid, manifest.documents.len());
    Ok(manifest)
}

/// Write every project, continuing past projects that fail
pub fn persist_projects(output_dir: &Path, projects: &[ClaudeProject]) -> ProjectsWritten {
    let mut written = ProjectsWritten::default();
    for project in projects {
        match persist_project(output_dir, project) {
            Ok(manifest) => {
                written.projects += 1;
                written.documents += manifest.documents.len();
            }
            Err(e) => warn!("{:#}", e),
        }
    }
    written
}
