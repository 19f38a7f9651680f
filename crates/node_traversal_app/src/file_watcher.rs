// SPDX-License-Identifier: MIT OR Apache-2.0
//! Watches the graph input file so edits show up without restarting.
//!
//! The debouncer runs its own thread and only sends events over a channel;
//! the frame loop polls that channel between frames and performs the reload
//! itself.

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

/// Debounce window for editor save bursts
const DEBOUNCE_DURATION: Duration = Duration::from_millis(250);

/// Events emitted by the input watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The input file was created or modified
    Changed(PathBuf),
    /// The input file was deleted
    Removed(PathBuf),
    /// The watcher reported an error
    Error(String),
}

/// Whether `candidate` names the watched file
fn is_input_file(candidate: &Path, file_name: &OsString) -> bool {
    candidate.file_name().is_some_and(|name| name == file_name.as_os_str())
}

/// Directory to watch for `input`; a bare file name is watched in `.`
fn watch_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Debounced watcher for a single input file
pub struct InputWatcher {
    /// The underlying debounced watcher
    _watcher: Debouncer<RecommendedWatcher, RecommendedCache>,
    /// Receiver for input events
    event_rx: Receiver<InputEvent>,
    /// Watched file
    path: PathBuf,
}

impl InputWatcher {
    /// Start watching `path`.
    ///
    /// The containing directory is watched non-recursively so that editors
    /// which replace the file on save are still picked up.
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let (event_tx, event_rx) = mpsc::channel();
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| notify::Error::generic("input path has no file name"))?;

        let mut watcher = new_debouncer(
            DEBOUNCE_DURATION,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    for event in events {
                        for path in event.paths.iter().filter(|p| is_input_file(p, &file_name)) {
                            let input_event = match event.kind {
                                EventKind::Create(_) | EventKind::Modify(_) => {
                                    InputEvent::Changed(path.clone())
                                }
                                EventKind::Remove(_) => InputEvent::Removed(path.clone()),
                                EventKind::Any | EventKind::Access(_) | EventKind::Other => continue,
                            };
                            let _ = event_tx.send(input_event);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = event_tx.send(InputEvent::Error(error.to_string()));
                    }
                }
            },
        )?;

        let dir = watch_dir(path);
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching {:?} for changes", path);

        Ok(Self {
            _watcher: watcher,
            event_rx,
            path: path.to_path_buf(),
        })
    }

    /// Watched file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Poll for pending events (non-blocking)
    pub fn poll_events(&self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Input watcher channel disconnected");
                    break;
                }
            }
        }
        events
    }

    /// Whether any pending event asks for a reload
    pub fn reload_requested(&self) -> bool {
        let mut reload = false;
        for event in self.poll_events() {
            match event {
                InputEvent::Changed(path) => {
                    tracing::debug!("Input changed: {:?}", path);
                    reload = true;
                }
                InputEvent::Removed(path) => {
                    tracing::warn!("Input file removed: {:?}; keeping the current graph", path);
                }
                InputEvent::Error(e) => tracing::warn!("Input watcher error: {e}"),
            }
        }
        reload
    }
}
