//! Output-directory resolution shared by every sink.
//!
//! Configured directories come from hand-edited files and are frequently
//! padded with whitespace, pasted with stray quotes, or joined with doubled
//! separators. [`clean_path`] normalises the text; [`resolve_log_dir`] also
//! makes sure the directory exists.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::errors::{Result, ResultLogError};

/// Characters rejected in path text on at least one supported platform.
const INVALID_PATH_CHARS: [char; 4] = ['"', '<', '>', '|'];

fn is_invalid_path_char(c: char) -> bool {
    c.is_ascii_control() || INVALID_PATH_CHARS.contains(&c)
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Sanitize a configured directory.
///
/// Blank input yields `default` (cleaned the same way). Otherwise the text is
/// trimmed, invalid characters become `_`, and runs of the same separator
/// collapse into one. The function is idempotent.
#[must_use]
pub fn clean_path(raw: &str, default: &Path) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        let fallback = default.to_string_lossy();
        if fallback.trim().is_empty() {
            return default.to_path_buf();
        }
        return clean_path(&fallback, Path::new(""));
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    let mut previous: Option<char> = None;
    for c in trimmed.chars() {
        let c = if is_invalid_path_char(c) { '_' } else { c };
        if is_separator(c) && previous == Some(c) {
            continue;
        }
        cleaned.push(c);
        previous = Some(c);
    }
    PathBuf::from(cleaned)
}

/// Clean `raw` and create the resulting directory (with parents) if missing.
///
/// Creation failure is returned as [`ResultLogError::DirectoryCreate`]; a sink
/// cannot operate without its directory.
pub fn resolve_log_dir(raw: &str, default: &Path) -> Result<PathBuf> {
    let dir = clean_path(raw, default);
    if !dir.is_dir() {
        fs::create_dir_all(&dir).map_err(|source| ResultLogError::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "created log directory");
    }
    Ok(dir)
}
