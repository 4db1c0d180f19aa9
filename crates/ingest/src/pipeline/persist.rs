//! Atomic JSON persistence for `DocumentResult`.
//!
//! The record is written to a temporary file in the destination directory,
//! flushed, then renamed over the target. Readers see the old file or the
//! complete new one, never a partial write.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use folio_core::{DocumentResult, PipelineError};

/// Pretty-printed atomic write.
pub fn write_json(result: &DocumentResult, path: &Path) -> Result<(), PipelineError> {
    write_json_with(result, path, true)
}

pub fn write_json_with(
    result: &DocumentResult,
    path: &Path,
    pretty: bool,
) -> Result<(), PipelineError> {
    let persist_err = |message: String| PipelineError::Persist {
        path: path.display().to_string(),
        message,
    };

    let mut body = if pretty {
        serde_json::to_vec_pretty(result)
    } else {
        serde_json::to_vec(result)
    }
    .map_err(|e| persist_err(format!("serialize: {e}")))?;
    body.push(b'\n');

    let file_name = path
        .file_name()
        .ok_or_else(|| persist_err("destination has no file name".to_string()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| persist_err(format!("create {}: {e}", dir.display())))?;

    let tmp = dir.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        Uuid::new_v4()
    ));
    let write = || -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    };

    if let Err(e) = write() {
        let _ = fs::remove_file(&tmp);
        return Err(persist_err(e.to_string()));
    }

    tracing::debug!(path = %path.display(), bytes = body.len(), "result written");
    Ok(())
}

/// Load a previously written result.
pub fn read_json(path: &Path) -> Result<DocumentResult, PipelineError> {
    let unreadable = |message: String| PipelineError::DocumentUnreadable {
        path: path.display().to_string(),
        message,
    };
    let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| unreadable(format!("invalid result JSON: {e}")))
}
