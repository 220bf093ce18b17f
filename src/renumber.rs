//! The line renumbering engine.

use std::time::Instant;

use serde::Serialize;

use crate::classify::{LineKind, canonicalize, close_continuation, open_continuation};
use crate::config::NumberPadding;
use crate::document::EditorHost;
use crate::edit::{EditBatch, EditLog, LineEdit};
use crate::position::Position;
use crate::session::Session;

/// Cursor column after a motion statement, right after `NNNN:`
pub const MOTION_COLUMN: usize = 5;
/// Cursor column after any other statement, right after `NNNN:  `
pub const STATEMENT_COLUMN: usize = 7;

/// Outcome of a renumbering pass that ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenumberReport {
    pub file_name: String,
    /// Line replacements that were applied
    pub edits: Vec<LineEdit>,
    /// Number of body lines visited
    pub lines_visited: usize,
    /// Where the cursor was moved, if it was
    pub cursor: Option<Position>,
    pub moved_position: bool,
    /// Document checksum after the pass
    pub checksum: String,
}

/// Replacements computed for one body, before anything is applied
#[derive(Debug, Clone)]
pub struct PassPlan {
    pub log: EditLog,
    pub lines_visited: usize,
    /// A motion statement was numbered
    pub moved_position: bool,
}

/// Compute canonical text for the body lines `[body_start, body_end - 1)`
///
/// Continuation lines take no number, so the number of line `i` of the body
/// is `i + 1` minus the continuations seen so far. Entering a continuation
/// run revises the previous line to a single terminator; leaving one
/// terminates the last continuation line. Both revisions overwrite the
/// entry already queued for that line.
pub fn plan_pass(lines: &[&str], body_start: usize, body_end: usize, padding: NumberPadding) -> PassPlan {
    let end = body_end.saturating_sub(1).min(lines.len());
    let body: &[&str] = if body_start < end { &lines[body_start..end] } else { &[] };

    let mut log = EditLog::new();
    let mut continuation_count = 0;
    let mut in_continuation = false;
    let mut moved_position = false;

    for (i, line) in body.iter().enumerate() {
        let line_index = body_start + i;
        let number = padding.format(i + 1 - continuation_count);
        let (kind, text) = canonicalize(line, &number);

        if kind == LineKind::Continuation {
            if !in_continuation && i > 0 {
                log.revise(line_index - 1, open_continuation);
            }
            in_continuation = true;
            continuation_count += 1;
        } else {
            if in_continuation {
                log.revise(line_index - 1, close_continuation);
                in_continuation = false;
            }
            if kind == LineKind::MotionStatement {
                moved_position = true;
            }
        }

        log.push(line_index, text);
    }

    PassPlan { log, lines_visited: body.len(), moved_position }
}

/// Renumber the host's document around its cursor
///
/// Returns `None` without touching anything when there is no active record
/// for the document, an engine edit is already in flight, automatic
/// renumbering is off and the pass is not `forced`, the cursor is outside the
/// body, or the line count has not changed since the last pass and the pass
/// is not `forced`.
pub fn renumber<H>(session: &mut Session, host: &mut H, forced: bool) -> Option<RenumberReport>
where
    H: EditorHost + ?Sized,
{
    let file_name = host.document().file_name();
    let Some(record) = session.record(&file_name).copied() else {
        tracing::trace!(file = %file_name, "no metadata record");
        return None;
    };
    let (Some(body_start), Some(body_end)) = (record.body_start, record.body_end) else {
        return None;
    };
    if !record.active || session.is_auto_update_in_progress() {
        return None;
    }
    if !session.config().auto_line_renumber && !forced {
        tracing::trace!(file = %file_name, "automatic renumbering disabled");
        return None;
    }

    let line_number = host.cursor().line;
    if !(body_start < line_number + 1 && line_number < body_end) {
        tracing::trace!(file = %file_name, line_number, body_start, body_end, "cursor outside body");
        return None;
    }
    if record.total_lines.abs_diff(record.processed_lines) < 1 && !forced {
        tracing::trace!(file = %file_name, "line count unchanged since last pass");
        return None;
    }

    let (batch, plan, line_count) = {
        let document = host.document();
        let lines = document.lines();
        let plan = plan_pass(&lines, body_start, body_end, session.config().number_padding);
        let batch = EditBatch {
            expected_checksum: document.checksum().to_string(),
            edits: plan.log.changed_against(&lines),
        };
        (batch, plan, lines.len())
    };

    session.set_auto_update_in_progress(true);
    let applied = host.apply_edits(&batch);
    if let Ok(changes) = &applied {
        for change in changes {
            session.on_change(change, Instant::now());
        }
    }
    session.set_auto_update_in_progress(false);

    if let Err(error) = applied {
        tracing::warn!(file = %file_name, %error, "renumbering batch rejected");
        return None;
    }

    let cursor = if record.total_lines > record.processed_lines {
        let column = if plan.moved_position { MOTION_COLUMN } else { STATEMENT_COLUMN };
        let position = Position::new(line_number, column);
        host.set_cursor(position);
        Some(position)
    } else {
        None
    };

    if let Some(record) = session.record_mut(&file_name) {
        record.processed_lines = line_count;
    }

    tracing::debug!(
        file = %file_name,
        edits = batch.len(),
        lines = plan.lines_visited,
        forced,
        "renumbered program"
    );

    Some(RenumberReport {
        file_name,
        edits: batch.edits,
        lines_visited: plan.lines_visited,
        cursor,
        moved_position: plan.moved_position,
        checksum: host.document().checksum().to_string(),
    })
}
