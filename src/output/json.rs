//! JSON outputs and the shared file-writing helpers.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::OutputError;

/// What happened to a single output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The output was skipped; the message says why.
    Skipped(String),
}

/// Parent directory of `path`; a bare file name lives in the current directory.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Make sure `path`'s parent directory exists, creating it when allowed.
///
/// Returns `Some(reason)` when the output has to be skipped.
pub fn prepare_parent(path: &Path, create_missing: bool) -> Result<Option<String>, OutputError> {
    let dir = parent_dir(path);

    if create_missing && !dir.exists() {
        println!("Creating missing folder '{}'.", dir.display());
        std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateFolder {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    if !dir.exists() {
        return Ok(Some(format!(
            "Skipping output, parent folder '{}' does not exist.",
            dir.display()
        )));
    }

    Ok(None)
}

/// Write `content` to `path` atomically via a temp file in the same directory.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), OutputError> {
    let write_failed = |source: std::io::Error| OutputError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(parent_dir(path)).map_err(write_failed)?;
    file.write_all(content.as_bytes()).map_err(write_failed)?;
    file.persist(path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

/// Serialize `value` as two-space indented JSON into `path`.
pub fn write_json<T: Serialize>(
    path: &Path,
    value: &T,
    what: &'static str,
    create_missing: bool,
) -> Result<WriteOutcome, OutputError> {
    if let Some(reason) = prepare_parent(path, create_missing)? {
        println!(" {}", reason);
        return Ok(WriteOutcome::Skipped(reason));
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| OutputError::Serialize(e, what))?;
    write_atomic(path, &json)?;

    println!("Created file '{}'.", path.display());
    Ok(WriteOutcome::Written)
}
