//! Event Dispatcher implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::application::events::{Action, ActionKind, PushEvent};
use crate::domain::entities::{FsEvent, FsEventKind};
use crate::domain::policies::PathPolicy;
use crate::domain::ports::{EventSource, Transport, TransportResult};
use crate::domain::value_objects::{RelPath, SyncTarget};

/// Longest wait for an event before the running flag is checked again
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal state of one dispatched event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Remote side updated
    Pushed,
    /// Path is ignored
    Ignored,
    /// A remote operation failed
    Failed,
    /// Directory event, or outside the local root
    Discarded,
}

/// Outcome counters for a dispatch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub pushed: usize,
    pub ignored: usize,
    pub failed: usize,
    pub discarded: usize,
}

impl DispatchStats {
    pub fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Pushed => self.pushed += 1,
            DispatchOutcome::Ignored => self.ignored += 1,
            DispatchOutcome::Failed => self.failed += 1,
            DispatchOutcome::Discarded => self.discarded += 1,
        }
    }
}

/// Routes filesystem events to remote operations
///
/// Holds no state between events; ordering comes from the caller feeding
/// events one at a time.
pub struct EventDispatcher<'a, T: Transport + ?Sized> {
    target: &'a SyncTarget,
    policy: &'a PathPolicy,
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> EventDispatcher<'a, T> {
    pub fn new(target: &'a SyncTarget, policy: &'a PathPolicy, transport: &'a T) -> Self {
        Self {
            target,
            policy,
            transport,
        }
    }

    /// Consume events until `running` is cleared
    pub fn run<S, F>(&self, source: &mut S, running: &AtomicBool, mut on_event: F) -> DispatchStats
    where
        S: EventSource + ?Sized,
        F: FnMut(PushEvent),
    {
        let mut stats = DispatchStats::default();
        while running.load(Ordering::SeqCst) {
            if let Some(event) = source.next_event(POLL_INTERVAL) {
                stats.record(self.dispatch(&event, &mut on_event));
            }
        }
        stats
    }

    /// Handle one event to completion
    pub fn dispatch<F>(&self, event: &FsEvent, on_event: &mut F) -> DispatchOutcome
    where
        F: FnMut(PushEvent),
    {
        if event.is_dir {
            tracing::trace!(path = %event.path.display(), "skipping directory event");
            return DispatchOutcome::Discarded;
        }

        let root = self.target.local_root();
        let kind = match &event.kind {
            FsEventKind::Created => ActionKind::Created,
            FsEventKind::Modified => ActionKind::Modified,
            FsEventKind::Deleted => ActionKind::Deleted,
            FsEventKind::Moved { to } => {
                return match (
                    RelPath::from_local(root, &event.path),
                    RelPath::from_local(root, to),
                ) {
                    (Ok(from), Ok(to)) => self.handle_moved(&from, &to, on_event),
                    // Moved out of the tree
                    (Ok(from), Err(_)) => self.handle_deleted(&from, on_event),
                    // Moved in from outside
                    (Err(_), Ok(to)) => self.handle_changed(ActionKind::Created, &to, on_event),
                    (Err(e), Err(_)) => {
                        tracing::debug!(error = %e, "skipping move outside the local root");
                        DispatchOutcome::Discarded
                    }
                };
            }
        };

        let path = match RelPath::from_local(root, &event.path) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "skipping event outside the local root");
                return DispatchOutcome::Discarded;
            }
        };

        match kind {
            ActionKind::Deleted => self.handle_deleted(&path, on_event),
            kind => self.handle_changed(kind, &path, on_event),
        }
    }

    fn handle_changed<F>(&self, kind: ActionKind, path: &RelPath, on_event: &mut F) -> DispatchOutcome
    where
        F: FnMut(PushEvent),
    {
        let action = Action::new(kind, path);
        if self.policy.is_ignored(path) {
            on_event(PushEvent::Ignored { action });
            return DispatchOutcome::Ignored;
        }

        self.perform(action, on_event, || {
            let remote = self.target.remote_path(path);
            self.transport.ensure_parent_dir(&remote)?;
            self.transport.copy(&self.target.local_path(path), &remote)
        })
    }

    fn handle_deleted<F>(&self, path: &RelPath, on_event: &mut F) -> DispatchOutcome
    where
        F: FnMut(PushEvent),
    {
        let action = Action::new(ActionKind::Deleted, path);
        // The oracle cannot judge a path that is gone, so only the prefix rules apply
        if self.policy.classify_without_oracle(path) == Some(true) {
            on_event(PushEvent::Ignored { action });
            return DispatchOutcome::Ignored;
        }

        self.perform(action, on_event, || {
            self.transport.remove(&self.target.remote_path(path))
        })
    }

    fn handle_moved<F>(&self, from: &RelPath, to: &RelPath, on_event: &mut F) -> DispatchOutcome
    where
        F: FnMut(PushEvent),
    {
        if self.policy.is_ignored(to) {
            tracing::debug!(from = %from, to = %to, "moved to an ignored path");
            return self.handle_deleted(from, on_event);
        }

        self.perform(Action::moved(from, to), on_event, || {
            let remote_from = self.target.remote_path(from);
            let remote_to = self.target.remote_path(to);

            self.transport.ensure_parent_dir(&remote_to)?;
            let renamed = self.transport.move_path(&remote_from, &remote_to);
            if let Err(e) = &renamed {
                tracing::debug!(error = %e, "remote rename failed, copying instead");
            }

            // Refresh content, or create it when the rename had nothing to move
            self.transport.copy(&self.target.local_path(to), &remote_to)?;

            if renamed.is_err() {
                self.transport.remove(&remote_from)?;
            }
            Ok(())
        })
    }

    fn perform<F, Op>(&self, action: Action, on_event: &mut F, op: Op) -> DispatchOutcome
    where
        F: FnMut(PushEvent),
        Op: FnOnce() -> TransportResult<()>,
    {
        on_event(PushEvent::ActionStarted {
            action: action.clone(),
        });

        match op() {
            Ok(()) => {
                on_event(PushEvent::Pushed { action });
                DispatchOutcome::Pushed
            }
            Err(e) => {
                tracing::debug!(action = %action.describe(), error = %e, "push failed");
                on_event(PushEvent::Failed {
                    action,
                    error: e.to_string(),
                });
                DispatchOutcome::Failed
            }
        }
    }
}
