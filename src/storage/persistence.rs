//! Atomic JSON persistence: temp file + rename

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize `value` as pretty JSON to `path`, atomically
///
/// Parent directories are created as needed. The JSON is written to a
/// sibling `.tmp` file first and renamed into place, so readers never see a
/// partial file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    let temp = temp_path(path);
    fs::write(&temp, json)
        .with_context(|| format!("Failed to write temp file: {}", temp.display()))?;
    fs::rename(&temp, path)
        .with_context(|| format!("Failed to rename temp file into place: {}", path.display()))?;

    Ok(())
}

/// Read a JSON file written by [`write_json_atomic`]
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
