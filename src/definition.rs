//! Go-to-definition for `CALL` and `RUN` statements.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Program '{0}.ls' not found in workspace.")]
    NotFound(String),
}

fn call_pattern() -> &'static Regex {
    static CALL_REGEX: OnceLock<Regex> = OnceLock::new();
    CALL_REGEX.get_or_init(|| Regex::new(r"\bCALL\s+(\w+)|\bRUN\s+(\w+)").expect("valid call regex"))
}

/// Program name of the `CALL`/`RUN` statement covering `column`
///
/// `column` is a 0-indexed character offset into `line`; the statement
/// covers the keyword through the end of the program name.
pub fn call_target_at(line: &str, column: usize) -> Option<String> {
    let byte_column = line
        .char_indices()
        .nth(column)
        .map_or(line.len(), |(offset, _)| offset);

    call_pattern()
        .captures_iter(line)
        .find(|caps| {
            caps.get(0)
                .is_some_and(|m| m.start() <= byte_column && byte_column <= m.end())
        })
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name == "node_modules" || name.starts_with('.'))
}

/// Find `<name>.ls` under `root`
///
/// The stem must match exactly; the extension in any case. Directories are
/// walked in sorted order and the first match is returned.
pub fn find_program(root: &Path, name: &str) -> Result<PathBuf, LookupError> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(Result::ok)
        .find(|entry| {
            let path = entry.path();
            entry.file_type().is_file()
                && path.file_stem().and_then(|s| s.to_str()) == Some(name)
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("ls"))
        })
        .map(|entry| entry.into_path())
        .ok_or_else(|| LookupError::NotFound(name.to_string()))
}
