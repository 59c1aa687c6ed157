//! Filesystem watcher
//!
//! A recursive notify watcher feeding one ordered channel. Events queue up
//! in the channel until the dispatcher asks for them, so changes made while
//! the initial sync runs are not lost.

mod translate;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::entities::FsEvent;
use crate::domain::ports::EventSource;
use crate::error::{PushError, PushResult};

pub use translate::Translator;

/// Live event source for one local root
pub struct NotifySource {
    root: PathBuf,
    // Dropping the watcher stops event delivery
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    translator: Translator,
}

impl std::fmt::Debug for NotifySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifySource")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl NotifySource {
    /// Start watching `root` recursively
    pub fn start(root: &Path) -> PushResult<Self> {
        let (tx, rx) = channel();

        let watch_error = |e: notify::Error| PushError::Watch {
            path: root.to_path_buf(),
            message: e.to_string(),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            },
            Config::default(),
        )
        .map_err(watch_error)?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(watch_error)?;

        tracing::debug!(root = %root.display(), "watching for changes");

        Ok(Self {
            root: root.to_path_buf(),
            _watcher: watcher,
            rx,
            translator: Translator::new(),
        })
    }
}

impl EventSource for NotifySource {
    fn next_event(&mut self, timeout: Duration) -> Option<FsEvent> {
        loop {
            if let Some(event) = self.translator.pop() {
                return Some(event);
            }

            match self.rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    tracing::trace!(?event, "raw notify event");
                    self.translator.push(event);
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "watch error");
                }
                Err(RecvTimeoutError::Timeout) => {
                    // A rename source with no destination by now left the tree
                    if !self.translator.has_pending() {
                        return None;
                    }
                    self.translator.flush();
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.translator.flush();
                    return self.translator.pop();
                }
            }
        }
    }
}
