//! Renumber a program file on disk whenever it changes.
//!
//! File system notifications stand in for editor change events: they feed
//! [`Session::on_change`], and the debounced pass runs once the file has
//! been quiet for the configured delay. Notifications for content this loop
//! wrote itself are recognized by checksum and dropped.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use thiserror::Error;

use crate::config::Config;
use crate::document::{Document, DocumentChange, Editor, EditorHost};
use crate::file::{FileError, read_file, write_file};
use crate::position::Position;
use crate::session::Session;

/// Wait used when no pass is pending
const IDLE_WAIT: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Failed to watch file: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    File(#[from] FileError),
}

/// Cursor placed on the first body line, if the document has a body
fn body_cursor(session: &Session, document: &Document) -> Position {
    let line = session
        .record(&document.file_name())
        .and_then(|record| record.body_start)
        .map_or(1, |start| start + 1);
    Position::new(line, 0)
}

fn touches(event: &Event, file_name: &std::ffi::OsStr) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}

/// Watch `path` until the notification channel closes
pub fn watch_file(path: &Path, config: Config) -> Result<(), WatchError> {
    let path: PathBuf = path.to_path_buf();
    let file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    let watch_root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let mut session = Session::new(config);
    let document = Document::from_file(read_file(&path)?);
    if !session.on_open(&document) {
        tracing::warn!(path = %path.display(), "automatic renumbering is off or file is not a TP listing");
    }
    let mut last_checksum = document.checksum().to_string();
    let cursor = body_cursor(&session, &document);
    let mut editor = Editor::new(document, cursor);

    let (sender, receiver) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = sender.send(res);
    })?;
    watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %path.display(), "watching program");

    loop {
        let timeout = session.next_deadline(Instant::now()).unwrap_or(IDLE_WAIT);
        match receiver.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                if !touches(&event, &file_name) {
                    continue;
                }
                let file = match read_file(&path) {
                    Ok(file) => file,
                    Err(error) => {
                        tracing::warn!(path = %path.display(), %error, "could not reload program");
                        continue;
                    }
                };
                if file.checksum == last_checksum {
                    tracing::trace!(path = %path.display(), "content unchanged");
                    continue;
                }
                last_checksum = file.checksum.clone();
                let document = Document::from_file(file);
                let cursor = body_cursor(&session, &document);
                editor = Editor::new(document, cursor);
                session.on_change(&DocumentChange { path: path.clone() }, Instant::now());
            }
            Ok(Err(error)) => tracing::warn!(%error, "watch error"),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let Some(report) = session.poll(&mut editor, Instant::now()) else {
                    continue;
                };
                if report.edits.is_empty() {
                    continue;
                }
                last_checksum = write_file(&path, editor.document().content())?;
                tracing::info!(
                    path = %path.display(),
                    edits = report.edits.len(),
                    "renumbered on change"
                );
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
