// Cursor and line span tracking
pub mod position;

// File operations module
pub mod file;

// Line edit batches
pub mod edit;

// Documents and the editor host boundary
pub mod document;

// Program format detection
pub mod language;

// User configuration
pub mod config;

// Change event debouncing
pub mod scheduler;

// Session state and event routing
pub mod session;

// Body marker tracking
pub mod tracker;

// Line classification rules
pub mod classify;

// Renumbering engine
pub mod renumber;

// Directory-wide name substitution
pub mod rename;

// CALL/RUN definition lookup
pub mod definition;

// Watch mode
pub mod watch;

// JSON output module
pub mod json;

// Re-exports
pub use position::{Position, Span, line_spans};
pub use file::{FileContent, FileError, compute_checksum, read_file, write_file};
pub use edit::{
    EditBatch, EditError, EditLog, LineEdit,
    apply_batch, sort_edits_descending, validate_line_edit, verify_checksum,
};
pub use document::{Document, DocumentChange, Editor, EditorHost};
pub use language::{Language, detect_language, is_program_file};
pub use config::{Config, ConfigError, NumberPadding};
pub use scheduler::Debouncer;
pub use session::Session;
pub use tracker::{BodyBounds, MetadataRecord, find_body, scan};
pub use classify::{LineKind, RULES, Rule, canonicalize, classify};
pub use renumber::{PassPlan, RenumberReport, plan_pass, renumber};
pub use rename::{RenameError, RenameReport, edit_name, edit_name_in_directory};
pub use definition::{LookupError, call_target_at, find_program};
pub use watch::{WatchError, watch_file};
pub use json::{RenameResponse, RenumberResponse, generate_execution_id};
