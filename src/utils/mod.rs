pub mod paths;

pub use paths::{
    PROJECT_MANIFEST_FILENAME, conversation_relative_path, format_path_with_tilde, project_dir,
    project_document_path, project_manifest_path, sanitize_filename, validate_file_size,
};
