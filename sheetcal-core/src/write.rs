//! Atomic output-file writing.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{SheetCalError, SheetCalResult};

/// Write `contents` to `path` via a temp file in the same directory plus a
/// rename, so a reader polling mid-deploy never observes a half-written
/// file. Creates parent directories as needed.
pub fn write_atomic(path: &Path, contents: &str) -> SheetCalResult<()> {
    let dir = path.parent().ok_or_else(|| SheetCalError::Write {
        path: path.display().to_string(),
        reason: "path has no parent directory".to_string(),
    })?;

    std::fs::create_dir_all(dir).map_err(|e| write_error(path, &e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, &e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| write_error(path, &e))?;
    tmp.persist(path).map_err(|e| write_error(path, &e))?;

    Ok(())
}

fn write_error(path: &Path, reason: &dyn std::fmt::Display) -> SheetCalError {
    SheetCalError::Write {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
