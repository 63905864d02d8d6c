//! Durable artifact store.
//!
//! All pipeline outputs (the generated definition, the run report) go
//! through [`write_text_atomic`]: parent directories are created on demand,
//! content lands in a temp file in the destination directory, is fsynced,
//! then renamed over the target. Readers never observe a half-written file,
//! and writing the same content twice yields byte-identical results.
//!
//! Text content is normalized to LF line endings before hashing or writing
//! so artifacts are stable across platforms.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Normalize CRLF to LF.
///
/// Applied to everything the store writes and reads, keeping artifact bytes
/// identical across platforms and across repeated runs.
#[must_use]
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// Receipt for a completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Absolute or caller-relative path the content landed at.
    pub path: Utf8PathBuf,
    /// Size of the normalized content in bytes.
    pub bytes: u64,
}

/// Write text to `path` atomically, creating parent directories as needed.
///
/// The content is CRLF-normalized, written to a temp file in the target's
/// directory, flushed and fsynced, then atomically renamed into place. An
/// existing file at `path` is replaced.
///
/// # Errors
///
/// Returns [`StoreError::CreateDir`] if a parent directory cannot be
/// created, and [`StoreError::Write`] for any failure while writing,
/// syncing, or renaming.
pub fn write_text_atomic(path: &Utf8Path, content: &str) -> Result<WrittenFile, StoreError> {
    let normalized = normalize_line_endings(content);

    let parent = path.parent().unwrap_or(Utf8Path::new("."));
    if !parent.as_str().is_empty() {
        fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
            path: parent.to_string(),
            reason: e.to_string(),
        })?;
    }

    // Temp file in the destination directory so the final rename stays on
    // one filesystem and is atomic.
    let mut temp = NamedTempFile::new_in(parent.as_std_path()).map_err(|e| StoreError::Write {
        path: path.to_string(),
        reason: format!("failed to create temp file: {e}"),
    })?;

    temp.write_all(normalized.as_bytes())
        .map_err(|e| StoreError::Write {
            path: path.to_string(),
            reason: format!("failed to write temp file: {e}"),
        })?;

    temp.as_file().sync_all().map_err(|e| StoreError::Write {
        path: path.to_string(),
        reason: format!("failed to sync temp file: {e}"),
    })?;

    temp.persist(path.as_std_path())
        .map_err(|e| StoreError::Write {
            path: path.to_string(),
            reason: format!("failed to persist temp file: {e}"),
        })?;

    tracing::debug!(path = %path, bytes = normalized.len(), "artifact written");

    Ok(WrittenFile {
        path: path.to_owned(),
        bytes: normalized.len() as u64,
    })
}

/// Read a text file, normalizing CRLF to LF.
///
/// # Errors
///
/// Returns [`StoreError::Read`] if the file cannot be read or is not UTF-8.
pub fn read_text_normalized(path: &Utf8Path) -> Result<String, StoreError> {
    let raw = fs::read_to_string(path.as_std_path()).map_err(|e| StoreError::Read {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(normalize_line_endings(&raw))
}
