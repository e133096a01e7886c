//! File primitives used by every sink.
//!
//! Each append opens the file, writes the fully formatted text with a single
//! `write_all`, and closes it again. Callers hold the sink lock around the
//! call, so a reader never sees a partial row from another writer.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::core::errors::{Result, ResultLogError};
use crate::sink::mode::LogMode;

/// `{kind}_{yyyyMMdd}{mode suffix}.{ext}`.
#[must_use]
pub fn dated_file_name(kind: &str, date: NaiveDate, mode: LogMode, ext: &str) -> String {
    format!(
        "{kind}_{}{}.{ext}",
        date.format("%Y%m%d"),
        mode.file_suffix()
    )
}

/// Append `text` to `path`, creating the file if needed.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ResultLogError::io(path, source))?;
    file.write_all(text.as_bytes())
        .map_err(|source| ResultLogError::io(path, source))
}

/// Create `path` holding `header` unless it already exists.
///
/// Returns `true` when this call created the file. An existing file keeps
/// whatever header it already has.
pub fn create_with_header(path: &Path, header: &str) -> Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(source) => return Err(ResultLogError::io(path, source)),
    };
    file.write_all(header.as_bytes())
        .map_err(|source| ResultLogError::io(path, source))?;
    Ok(true)
}

/// Replace `path` with `text` in full.
///
/// The new content is written to a sibling temp file and renamed over the
/// target, so readers see either the previous snapshot or the new one.
pub fn replace_text(path: &Path, text: &str) -> Result<()> {
    let tmp = temp_sibling(path);
    let write = || -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp)?;
        file.write_all(text.as_bytes())?;
        file.sync_data()
    };
    if let Err(source) = write() {
        let _ = fs::remove_file(&tmp);
        return Err(ResultLogError::io(&tmp, source));
    }
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        ResultLogError::io(path, source)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
