//! Session state shared by the tracker and the renumbering engine.
//!
//! A [`Session`] lives from editor startup to shutdown. It owns the metadata
//! records, the suppression flag raised while the engine applies its own
//! edits, the last focused document, the configuration and the debounce
//! timer for change events.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::document::{Document, DocumentChange, EditorHost};
use crate::language::is_program_file;
use crate::renumber::{RenumberReport, renumber};
use crate::scheduler::Debouncer;
use crate::tracker::{MetadataRecord, scan};

#[derive(Debug)]
pub struct Session {
    config: Config,
    records: HashMap<String, MetadataRecord>,
    auto_update_in_progress: bool,
    last_active: Option<PathBuf>,
    scheduler: Debouncer<PathBuf>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let scheduler = Debouncer::new(config.debounce());
        Self {
            config,
            records: HashMap::new(),
            auto_update_in_progress: false,
            last_active: None,
            scheduler,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn record(&self, file_name: &str) -> Option<&MetadataRecord> {
        self.records.get(file_name)
    }

    pub fn record_mut(&mut self, file_name: &str) -> Option<&mut MetadataRecord> {
        self.records.get_mut(file_name)
    }

    pub(crate) fn records_mut(&mut self) -> &mut HashMap<String, MetadataRecord> {
        &mut self.records
    }

    pub fn is_auto_update_in_progress(&self) -> bool {
        self.auto_update_in_progress
    }

    pub(crate) fn set_auto_update_in_progress(&mut self, value: bool) {
        self.auto_update_in_progress = value;
    }

    pub fn last_active(&self) -> Option<&Path> {
        self.last_active.as_deref()
    }

    /// A document was opened
    ///
    /// Returns true when the document was scanned.
    pub fn on_open(&mut self, document: &Document) -> bool {
        let language = document.language();
        if !language.is_supported() || !self.config.auto_line_renumber {
            tracing::trace!(path = %document.path().display(), %language, "not tracking document");
            return false;
        }
        scan(self, document);
        true
    }

    /// A document's text changed
    ///
    /// Changes raised while the engine applies its own batch are dropped.
    /// Otherwise the debounce timer restarts for the changed document.
    /// Returns true when a pass was scheduled.
    pub fn on_change(&mut self, change: &DocumentChange, now: Instant) -> bool {
        if self.auto_update_in_progress {
            tracing::trace!(path = %change.path.display(), "ignoring change from own edit");
            return false;
        }
        if !is_program_file(&change.path) {
            return false;
        }
        self.scheduler.schedule(change.path.clone(), now);
        true
    }

    /// Time until the pending change pass is due
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.scheduler.remaining(now)
    }

    /// Run the debounced pass if its timer has fired for the host's document
    pub fn poll<H: EditorHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> Option<RenumberReport> {
        let due = self.scheduler.due(now)?;
        if due != host.document().path() {
            tracing::trace!(path = %due.display(), "debounced document is not focused");
            return None;
        }
        if self.auto_update_in_progress || !self.config.auto_line_renumber {
            return None;
        }
        scan(self, host.document());
        renumber(self, host, false)
    }

    /// Manual "update line numbers" command on the focused document
    ///
    /// Runs whatever the enabled switch says, so the document is scanned here
    /// even if `on_open` skipped it.
    pub fn update_line_numbers<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> Option<RenumberReport> {
        if !host.document().language().is_supported() {
            return None;
        }
        scan(self, host.document());
        renumber(self, host, true)
    }

    /// The focused editor switched to `path`
    ///
    /// Returns true when it differs from the previously focused document.
    pub fn on_active_editor_change(&mut self, path: &Path) -> bool {
        if self.last_active.as_deref() == Some(path) {
            return false;
        }
        self.last_active = Some(path.to_path_buf());
        true
    }

    /// Drop all records and any pending pass
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.records.clear();
        self.last_active = None;
        self.auto_update_in_progress = false;
    }
}
