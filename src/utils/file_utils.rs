//! File system utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::AppResult;

/// Characters rejected by common filesystems in a file name
const RESERVED_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Ensure directory exists, creating intermediate directories
pub fn ensure_dir_exists(path: &Path) -> AppResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        tracing::debug!("📁 Created directory {}", path.display());
    }
    Ok(())
}

/// Sanitize filename for filesystem.
///
/// Only the reserved characters are replaced with `_`; everything else,
/// including whitespace and non-ASCII text, is kept as is.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Final output path for a title inside `dir`
pub fn output_file_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_filename(title), extension))
}

/// Remove a file, treating "already gone" as success
pub fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
