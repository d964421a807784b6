use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::models::{ClaudeDocument, ConversationMetadata, Platform};

// Maximum export file size: 2GB (a batch is loaded into memory whole)
const MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Sanitized names are cut to this many characters
const MAX_FILENAME_CHARS: usize = 100;

const FALLBACK_FILENAME: &str = "untitled";
const UNDATED_DIR: &str = "undated";
const PROJECTS_DIR: &str = "projects";
const DOCUMENTS_DIR: &str = "documents";
pub const PROJECT_MANIFEST_FILENAME: &str = "project.json";

/// Characters of the conversation id appended to file names
const ID_PREFIX_CHARS: usize = 8;

/// Characters that are unsafe in file names on at least one platform
fn is_reserved(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
}

/// Make a title safe to use as a file or directory name
///
/// Reserved characters become `_`, runs of `_` collapse to one, leading and
/// trailing `_` and whitespace are trimmed, leading dots are dropped, and the
/// result is capped at 100 characters. An empty result becomes `untitled`.
///
/// # Examples
///
/// ```
/// use chat_export_transformer::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What is 2/3?"), "What is 2_3");
/// assert_eq!(sanitize_filename("???"), "untitled");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if is_reserved(c) { '_' } else { c };
        if c == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(c);
    }

    // No leading dots: "." and ".." must never become path components
    let trimmed = sanitized
        .trim_start_matches(|c: char| c == '_' || c == '.' || c.is_whitespace())
        .trim_end_matches(|c: char| c == '_' || c.is_whitespace());
    let capped: String = trimmed.chars().take(MAX_FILENAME_CHARS).collect();
    let capped = capped.trim_end_matches(|c: char| c == '_' || c.is_whitespace());

    if capped.is_empty() { FALLBACK_FILENAME.to_string() } else { capped.to_string() }
}

/// Output location of a conversation, relative to the output directory
///
/// - Claude conversations in a project: `claude/projects/<project>/`
/// - everything else: `<platform>/chats/<YYYY>/<MM>/` (`undated/` without a creation date)
///
/// The file name is `<YYYY-MM-DD>_<title>_<id prefix>.json`; the id prefix
/// keeps same-day conversations with identical titles apart.
pub fn conversation_relative_path(metadata: &ConversationMetadata) -> PathBuf {
    let mut path = match (&metadata.project, metadata.platform) {
        (Some(project), Platform::Claude) => project_dir(project),
        _ => {
            let mut path = PathBuf::from(metadata.platform.as_str());
            path.push("chats");
            match metadata.created_date {
                Some(created) => {
                    path.push(created.format("%Y").to_string());
                    path.push(created.format("%m").to_string());
                }
                None => path.push(UNDATED_DIR),
            }
            path
        }
    };

    path.push(conversation_filename(metadata));
    path
}

/// Directory of a Claude project, relative to the output directory
pub fn project_dir(project_name: &str) -> PathBuf {
    let mut path = PathBuf::from(Platform::Claude.as_str());
    path.push(PROJECTS_DIR);
    path.push(sanitize_filename(project_name));
    path
}

/// `claude/projects/<project>/project.json`
pub fn project_manifest_path(project_name: &str) -> PathBuf {
    project_dir(project_name).join(PROJECT_MANIFEST_FILENAME)
}

/// `claude/projects/<project>/documents/<filename>_<id prefix>.json`
pub fn project_document_path(project_name: &str, document: &ClaudeDocument) -> PathBuf {
    let id_prefix: String = document.uuid.chars().take(ID_PREFIX_CHARS).collect();
    let name = if id_prefix.is_empty() {
        format!("{}.json", sanitize_filename(&document.filename))
    } else {
        format!("{}_{}.json", sanitize_filename(&document.filename), sanitize_filename(&id_prefix))
    };
    project_dir(project_name).join(DOCUMENTS_DIR).join(name)
}

fn conversation_filename(metadata: &ConversationMetadata) -> String {
    let date = match metadata.created_date {
        Some(created) => created.format("%Y-%m-%d").to_string(),
        None => UNDATED_DIR.to_string(),
    };
    let id_prefix: String = metadata.id.chars().take(ID_PREFIX_CHARS).collect();
    format!("{}_{}_{}.json", date, sanitize_filename(&metadata.title), sanitize_filename(&id_prefix))
}

/// Validates that a file's size is within acceptable limits (2GB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 2GB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use chat_export_transformer::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/exports");
/// // Returns "~/exports" when the home directory is /Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, dirs::home_dir().as_deref())
}

/// Internal helper for path formatting with an explicit home directory (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(rest) = path.strip_prefix(home)
    {
        return if rest.as_os_str().is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", rest.display())
        };
    }

    // Avoid double allocation when converting Cow to String
    match path.to_string_lossy() {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
