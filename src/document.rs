//! In-memory documents and the editor host boundary.
//!
//! The renumbering engine never talks to a concrete editor. It reads the
//! focused document and cursor through [`EditorHost`] and hands back one
//! [`EditBatch`] per pass. [`Editor`] is the plain in-memory host used by the
//! CLI and the tests.

use std::path::{Path, PathBuf};

use crate::edit::{EditBatch, EditError, apply_batch};
use crate::file::{FileContent, compute_checksum};
use crate::language::{Language, detect_language};
use crate::position::Position;

/// A program listing open in the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    content: String,
    checksum: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let checksum = compute_checksum(&content);
        Self { path: path.into(), content, checksum }
    }

    pub fn from_file(file: FileContent) -> Self {
        Self {
            path: PathBuf::from(file.path),
            content: file.content,
            checksum: file.checksum,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component; metadata records are keyed by it
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn language(&self) -> Language {
        detect_language(&self.path)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Lines without their line endings
    pub fn lines(&self) -> Vec<&str> {
        self.content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    /// Number of lines; text ending in a newline counts the empty last line
    pub fn line_count(&self) -> usize {
        self.content.bytes().filter(|b| *b == b'\n').count() + 1
    }

    /// Apply a batch atomically; on error the document is unchanged
    pub fn apply(&mut self, batch: &EditBatch) -> Result<(), EditError> {
        let new_content = apply_batch(&self.content, batch)?;
        self.checksum = compute_checksum(&new_content);
        self.content = new_content;
        Ok(())
    }
}

/// Notification that a document's text changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub path: PathBuf,
}

/// The editor surface the renumbering engine drives
pub trait EditorHost {
    /// The focused document
    fn document(&self) -> &Document;

    /// Current cursor position
    fn cursor(&self) -> Position;

    /// Apply a batch as one atomic edit, returning the change notifications it raised
    fn apply_edits(&mut self, batch: &EditBatch) -> Result<Vec<DocumentChange>, EditError>;

    fn set_cursor(&mut self, position: Position);
}

/// In-memory editor holding one document and a cursor
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    cursor: Position,
}

impl Editor {
    pub fn new(document: Document, cursor: Position) -> Self {
        Self { document, cursor }
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

impl EditorHost for Editor {
    fn document(&self) -> &Document {
        &self.document
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn apply_edits(&mut self, batch: &EditBatch) -> Result<Vec<DocumentChange>, EditError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        self.document.apply(batch)?;
        Ok(vec![DocumentChange { path: self.document.path().to_path_buf() }])
    }

    fn set_cursor(&mut self, position: Position) {
        self.cursor = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::LineEdit;

    #[test]
    fn test_lines_and_line_count() {
        let doc = Document::new("/robot/MAIN.ls", "/MN\r\n   1:  ;\r\n/END\r\n");

        assert_eq!(doc.lines(), vec!["/MN", "   1:  ;", "/END", ""]);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.file_name(), "MAIN.ls");
        assert_eq!(doc.language(), Language::FanucTp);
    }

    #[test]
    fn test_apply_updates_checksum() {
        let mut doc = Document::new("A.ls", "x\ny");
        let batch = EditBatch {
            expected_checksum: doc.checksum().to_string(),
            edits: vec![LineEdit::new(1, "z")],
        };

        doc.apply(&batch).unwrap();

        assert_eq!(doc.content(), "x\nz");
        assert_eq!(doc.checksum(), compute_checksum("x\nz"));
    }

    #[test]
    fn test_editor_reports_change_only_for_non_empty_batch() {
        let mut editor = Editor::new(Document::new("A.ls", "x"), Position::new(1, 0));
        let empty = EditBatch {
            expected_checksum: editor.document().checksum().to_string(),
            edits: Vec::new(),
        };
        assert!(editor.apply_edits(&empty).unwrap().is_empty());

        let batch = EditBatch {
            expected_checksum: editor.document().checksum().to_string(),
            edits: vec![LineEdit::new(0, "y")],
        };
        let changes = editor.apply_edits(&batch).unwrap();
        assert_eq!(changes, vec![DocumentChange { path: PathBuf::from("A.ls") }]);
    }
}
