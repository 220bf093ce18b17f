//! Literal name substitution across program listings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::file::{FileError, read_file, write_file};
use crate::language::is_program_file;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Directory not found: {0}")]
    NotFound(String),
    #[error("I/O error listing {path}: {error}")]
    Io { path: PathBuf, error: io::Error },
    #[error(transparent)]
    File(#[from] FileError),
}

/// Files touched by a directory-wide rename
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    /// Program files examined
    pub files_scanned: usize,
    /// Program files rewritten and saved
    pub files_changed: Vec<PathBuf>,
    /// Occurrences replaced across all files
    pub replacements: usize,
}

/// Replace every occurrence of `old_item` in `text`
///
/// The replacement is `old_item` with its first `old_name` swapped for
/// `new_name`, so renaming `PR[3:APPROACH]` from `APPROACH` to `ABOVE`
/// rewrites each `PR[3:APPROACH]` to `PR[3:ABOVE]`. Matching is literal.
///
/// # Returns
/// * `Some((new_text, count))` - when `old_item` occurs at least once
/// * `None` - when it does not occur or is empty
pub fn edit_name(text: &str, old_item: &str, old_name: &str, new_name: &str) -> Option<(String, usize)> {
    if old_item.is_empty() {
        return None;
    }
    let count = text.matches(old_item).count();
    if count == 0 {
        return None;
    }
    let new_item = old_item.replacen(old_name, new_name, 1);
    Some((text.replace(old_item, &new_item), count))
}

/// Apply [`edit_name`] to every program file directly inside `directory`
///
/// Only files with an `.ls` extension (any case) are considered;
/// subdirectories are not entered. Each file that contains `old_item` is
/// rewritten and saved.
pub fn edit_name_in_directory(
    directory: &Path,
    old_item: &str,
    old_name: &str,
    new_name: &str,
) -> Result<RenameReport, RenameError> {
    if !directory.is_dir() {
        return Err(RenameError::NotFound(directory.display().to_string()));
    }

    let io_error = |error| RenameError::Io { path: directory.to_path_buf(), error };
    let mut paths = Vec::new();
    for entry in fs::read_dir(directory).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && is_program_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut report = RenameReport { files_scanned: paths.len(), ..RenameReport::default() };
    for path in paths {
        let file = read_file(&path)?;
        if let Some((new_text, count)) = edit_name(&file.content, old_item, old_name, new_name) {
            write_file(&path, &new_text)?;
            tracing::debug!(path = %path.display(), count, "renamed occurrences");
            report.replacements += count;
            report.files_changed.push(path);
        }
    }

    Ok(report)
}
