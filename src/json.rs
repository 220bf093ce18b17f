//! Structured reports printed by `--json`.

use serde::Serialize;

use crate::edit::LineEdit;
use crate::position::Position;
use crate::rename::RenameReport;
use crate::renumber::RenumberReport;

/// Generate a fresh execution id for a report
pub fn generate_execution_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Result of a `renumber` run
#[derive(Debug, Clone, Serialize)]
pub struct RenumberResponse {
    pub execution_id: String,
    pub success: bool,
    pub file: String,
    /// Pass ran (false when a guard skipped it)
    pub renumbered: bool,
    pub applied_count: usize,
    pub edits: Vec<LineEdit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenumberResponse {
    pub fn from_report(execution_id: String, file: String, report: Option<RenumberReport>) -> Self {
        match report {
            Some(report) => Self {
                execution_id,
                success: true,
                file,
                renumbered: true,
                applied_count: report.edits.len(),
                edits: report.edits,
                cursor: report.cursor,
                final_checksum: Some(report.checksum),
                error: None,
            },
            None => Self {
                execution_id,
                success: true,
                file,
                renumbered: false,
                applied_count: 0,
                edits: Vec::new(),
                cursor: None,
                final_checksum: None,
                error: None,
            },
        }
    }

    pub fn failure(execution_id: String, file: String, error: String) -> Self {
        Self {
            execution_id,
            success: false,
            file,
            renumbered: false,
            applied_count: 0,
            edits: Vec::new(),
            cursor: None,
            final_checksum: None,
            error: Some(error),
        }
    }
}

/// Result of a directory-wide `rename` run
#[derive(Debug, Clone, Serialize)]
pub struct RenameResponse {
    pub execution_id: String,
    pub success: bool,
    #[serde(flatten)]
    pub report: RenameReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenameResponse {
    pub fn success(execution_id: String, report: RenameReport) -> Self {
        Self { execution_id, success: true, report, error: None }
    }

    pub fn failure(execution_id: String, error: String) -> Self {
        Self {
            execution_id,
            success: false,
            report: RenameReport::default(),
            error: Some(error),
        }
    }
}
