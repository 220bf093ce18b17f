use serde::Serialize;
use thiserror::Error;

use crate::file::compute_checksum;
use crate::position::line_spans;

/// Replacement of one whole line of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEdit {
    /// Line index (0-indexed)
    pub line: usize,
    /// New text of the line, without line ending
    pub replacement: String,
}

impl LineEdit {
    pub fn new(line: usize, replacement: impl Into<String>) -> Self {
        Self { line, replacement: replacement.into() }
    }
}

/// A set of line replacements applied as one atomic operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBatch {
    /// Checksum of the document the batch was computed against
    pub expected_checksum: String,
    /// Line replacements, at most one per line
    pub edits: Vec<LineEdit>,
}

impl EditBatch {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }
}

/// Error types for edit operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// Line index past the end of the document
    #[error("Line {line} out of bounds (line count: {line_count})")]
    LineOutOfRange { line: usize, line_count: usize },
    /// Two edits target the same line
    #[error("Duplicate edit for line {line}")]
    DuplicateLine { line: usize },
    /// Replacement would split the line
    #[error("Replacement for line {line} contains a line break")]
    MultilineReplacement { line: usize },
    /// Checksum verification failed
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Verify that document content matches the expected checksum
///
/// # Arguments
/// * `content` - The document content to verify
/// * `expected_checksum` - The expected BLAKE3 checksum (hex-encoded)
pub fn verify_checksum(content: &str, expected_checksum: &str) -> Result<(), EditError> {
    let actual_checksum = compute_checksum(content);

    if actual_checksum == expected_checksum {
        Ok(())
    } else {
        Err(EditError::ChecksumMismatch {
            expected: expected_checksum.to_string(),
            actual: actual_checksum,
        })
    }
}

/// Sort edits by line in descending order for sequential application
///
/// Splicing from the bottom of the document upward keeps the byte offsets of
/// the remaining (earlier) lines valid.
pub fn sort_edits_descending(edits: &[LineEdit]) -> Vec<LineEdit> {
    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| b.line.cmp(&a.line));
    sorted
}

/// Validate a single line edit against a document's line count
pub fn validate_line_edit(edit: &LineEdit, line_count: usize) -> Result<(), EditError> {
    if edit.line >= line_count {
        return Err(EditError::LineOutOfRange { line: edit.line, line_count });
    }
    if edit.replacement.contains('\n') || edit.replacement.contains('\r') {
        return Err(EditError::MultilineReplacement { line: edit.line });
    }
    Ok(())
}

/// Apply a batch of line replacements to `content`
///
/// The batch is all-or-nothing: the checksum and every edit are validated
/// before any text is touched, so an error leaves no partial result. Line
/// endings of the original content are preserved.
///
/// # Returns
/// * `Ok(String)` - New content after all replacements
/// * `Err(EditError)` - Checksum mismatch or an invalid edit
pub fn apply_batch(content: &str, batch: &EditBatch) -> Result<String, EditError> {
    verify_checksum(content, &batch.expected_checksum)?;

    let spans = line_spans(content);
    let sorted = sort_edits_descending(&batch.edits);

    for (i, edit) in sorted.iter().enumerate() {
        validate_line_edit(edit, spans.len())?;
        if i > 0 && sorted[i - 1].line == edit.line {
            return Err(EditError::DuplicateLine { line: edit.line });
        }
    }

    let mut new_content = content.to_string();
    for edit in &sorted {
        let span = spans[edit.line];
        new_content.replace_range(span.byte_start..span.byte_end, &edit.replacement);
    }

    Ok(new_content)
}

/// Append-only log of pending line replacements
///
/// Entries are queued in line order. Revising a line that was already queued
/// overwrites its entry in place instead of queueing a second one.
#[derive(Debug, Default, Clone)]
pub struct EditLog {
    entries: Vec<LineEdit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the replacement for `line`
    pub fn push(&mut self, line: usize, replacement: String) {
        match self.index_of(line) {
            Some(k) => self.entries[k].replacement = replacement,
            None => self.entries.push(LineEdit { line, replacement }),
        }
    }

    /// Overwrite the queued replacement for `line` with `f(current)`
    ///
    /// Returns false when nothing is queued for `line`.
    pub fn revise<F>(&mut self, line: usize, f: F) -> bool
    where
        F: FnOnce(&str) -> String,
    {
        match self.index_of(line) {
            Some(k) => {
                let revised = f(&self.entries[k].replacement);
                self.entries[k].replacement = revised;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LineEdit] {
        &self.entries
    }

    /// Entries whose replacement differs from the current text of their line
    pub fn changed_against(&self, lines: &[&str]) -> Vec<LineEdit> {
        self.entries
            .iter()
            .filter(|e| lines.get(e.line).is_none_or(|current| *current != e.replacement))
            .cloned()
            .collect()
    }

    fn index_of(&self, line: usize) -> Option<usize> {
        self.entries.iter().rposition(|e| e.line == line)
    }
}
