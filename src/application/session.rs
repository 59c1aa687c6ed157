//! Session Controller
//!
//! Top-level lifecycle: detect the ignore policy, validate flags, open the
//! transport, reconcile, then push changes until interrupted. The transport
//! is dropped (and torn down) on every exit path, including panics.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::dispatch::{DispatchStats, EventDispatcher};
use crate::application::events::PushEvent;
use crate::application::reconcile::Reconciler;
use crate::config::SyncConfig;
use crate::domain::policies::PathPolicy;
use crate::domain::ports::{EventSource, Transport};
use crate::domain::value_objects::SyncTarget;
use crate::error::{PushError, PushResult};

/// The outside world a session needs
pub trait SessionBackend {
    type Transport: Transport;
    type Events: EventSource;

    /// Pick the ignore policy for `root`
    fn detect_policy(&self, root: &Path, include_all: bool) -> PathPolicy;

    /// Open the one connection used for the whole session
    fn open_transport(&self, target: &SyncTarget) -> PushResult<Self::Transport>;

    /// Start delivering filesystem events for `root`
    fn watch(&self, root: &Path) -> PushResult<Self::Events>;
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// `exit_after` was set and the initial sync succeeded
    SyncedAndExited,
    /// Interrupted while pushing changes
    Stopped(DispatchStats),
}

/// Drives one session from startup to shutdown
#[derive(Debug)]
pub struct SessionController {
    target: SyncTarget,
    config: SyncConfig,
    running: Arc<AtomicBool>,
}

impl SessionController {
    pub fn new(target: SyncTarget, config: SyncConfig, running: Arc<AtomicBool>) -> Self {
        Self {
            target,
            config,
            running,
        }
    }

    /// Run the session to completion
    pub fn run<B, F>(&self, backend: &B, mut on_event: F) -> PushResult<SessionOutcome>
    where
        B: SessionBackend,
        F: FnMut(PushEvent),
    {
        let root = self.target.local_root();
        if !root.is_dir() {
            return Err(PushError::LocalRootNotFound {
                path: root.to_path_buf(),
            });
        }

        let policy = backend.detect_policy(root, self.config.include_all);
        self.validate()?;

        let transport = backend.open_transport(&self.target)?;
        on_event(PushEvent::SessionStarted {
            target: self.target.display_name(),
            local_root: root.display().to_string(),
            policy: policy.policy().to_string(),
        });

        // Start watching first so changes made during the initial sync queue up
        let mut events = if self.config.exit_after {
            None
        } else {
            Some(backend.watch(root)?)
        };

        if self.config.skip_init {
            tracing::info!("skipping initial sync");
        } else {
            Reconciler::new(&self.target, &policy, &transport)
                .reconcile(self.config.keep_extra, &mut on_event)?;
        }

        let Some(source) = events.as_mut() else {
            on_event(PushEvent::Shutdown);
            return Ok(SessionOutcome::SyncedAndExited);
        };

        on_event(PushEvent::Waiting);
        let stats = EventDispatcher::new(&self.target, &policy, &transport).run(
            source,
            &self.running,
            &mut on_event,
        );
        on_event(PushEvent::Shutdown);

        tracing::debug!(?stats, "session stopped");
        Ok(SessionOutcome::Stopped(stats))
    }

    /// Ask a running session to stop after the current event
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn validate(&self) -> PushResult<()> {
        if self.config.skip_init && self.config.exit_after {
            return Err(PushError::ConflictingFlags);
        }
        Ok(())
    }
}
