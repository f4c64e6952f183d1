//! Folder scanning for uploadable files

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect regular files whose extension is in `allowed`
///
/// Extension matching is case-insensitive; files without an extension are
/// skipped. Symlinks are not followed. A missing or unreadable folder is an
/// error rather than an empty result.
pub(crate) fn uploadable_files(folder: &Path, allowed: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let eligible = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| allowed.iter().any(|a| a.eq_ignore_ascii_case(e)));
        if eligible {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
