use std::path::Path;

use crate::error::{IngestError, IngestResult};

/// Characters DuckDB's file readers treat as a glob pattern.
const GLOB_CHARS: &[char] = &['*', '?', '[', ']'];

/// The path as the text that goes into `read_csv_auto('...')`.
///
/// DuckDB expands globs and a leading `~` before opening anything, so a path that would
/// be rewritten that way could read a different file (or several) than the one that
/// passed the existence check. Such paths are refused rather than escaped.
pub fn source_literal(path: &Path) -> IngestResult<&str> {
    let unsupported = |reason: &'static str| IngestError::UnsupportedPath {
        path: path.to_path_buf(),
        reason,
    };

    let text = path.to_str().ok_or_else(|| unsupported("path is not valid UTF-8"))?;
    if text.contains(GLOB_CHARS) {
        return Err(unsupported("path contains glob characters (* ? [ ])"));
    }
    if text.starts_with('~') {
        return Err(unsupported("path starts with `~`, which DuckDB expands to the home directory"));
    }
    Ok(text)
}
