//! Locates the renumberable body of a program listing.

use serde::Serialize;

use crate::document::Document;
use crate::session::Session;

/// Marker ending the header; the body starts on the next line
pub const HEADER_MARKER: &str = "/MN";
/// Marker of the position data section
pub const POSITION_MARKER: &str = "/POS";
/// Marker ending the program
pub const END_MARKER: &str = "/END";

/// Body bounds and line counts of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// First body line (0-indexed)
    pub body_start: Option<usize>,
    /// Terminating marker line (0-indexed) plus one
    pub body_end: Option<usize>,
    /// Header and a terminating marker were both found
    pub active: bool,
    /// Line count at the last scan
    pub total_lines: usize,
    /// Line count at the last renumbering pass
    pub processed_lines: usize,
}

/// Result of scanning a document for its markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyBounds {
    pub body_start: Option<usize>,
    pub body_end: Option<usize>,
    pub active: bool,
}

/// Find the body between the header marker and the first terminating marker
///
/// `/POS` ends the scan as soon as it is seen, so it wins over any `/END`
/// further down.
pub fn find_body(lines: &[&str]) -> BodyBounds {
    let mut body_start = None;
    let mut body_end = None;
    let mut header_found = false;
    let mut terminator_found = false;

    for (i, line) in lines.iter().enumerate() {
        if line.contains(HEADER_MARKER) {
            body_start = Some(i + 1);
            header_found = true;
        }
        if line.contains(POSITION_MARKER) || line.contains(END_MARKER) {
            body_end = Some(i + 1);
            terminator_found = true;
            break;
        }
    }

    BodyBounds {
        body_start,
        body_end,
        active: header_found && terminator_found,
    }
}

/// Scan `document` and store its metadata record in the session
///
/// The first scan of a file name creates the record with both line counts
/// set to the current count. Later scans keep `processed_lines`, which only
/// the renumbering engine advances.
pub fn scan(session: &mut Session, document: &Document) {
    let lines = document.lines();
    let bounds = find_body(&lines);
    let line_count = lines.len();
    let file_name = document.file_name();

    tracing::debug!(
        file = %file_name,
        body_start = ?bounds.body_start,
        body_end = ?bounds.body_end,
        active = bounds.active,
        line_count,
        "scanned program"
    );

    let record = session
        .records_mut()
        .entry(file_name)
        .or_insert(MetadataRecord {
            body_start: None,
            body_end: None,
            active: false,
            total_lines: line_count,
            processed_lines: line_count,
        });

    record.body_start = bounds.body_start;
    record.body_end = bounds.body_end;
    record.active = bounds.active;
    record.total_lines = line_count;
}
