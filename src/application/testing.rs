//! Test doubles for the application layer

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::FsEvent;
use crate::domain::ports::{
    BulkSync, CommandOutput, DeleteMode, EventSource, OracleError, PathSet, Transport,
    TransportError, TransportResult, VcsOracle,
};
use crate::domain::value_objects::{RelPath, RemotePath, VcsKind};

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Mkdir(String),
    Copy(PathBuf, String),
    Remove(String),
    Move(String, String),
    Run(String),
    Bulk(PathSet, DeleteMode),
    Closed,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Transport that records every call and fails the operations it is told to
#[derive(Debug, Default)]
pub struct RecordingTransport {
    log: CallLog,
    failing: RefCell<HashSet<&'static str>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the call log, usable after the transport is dropped
    pub fn log(&self) -> CallLog {
        Rc::clone(&self.log)
    }

    /// Make every call of `op` (`mkdir`, `copy`, `remove`, `move`, `bulk`) fail
    pub fn fail(self, op: &'static str) -> Self {
        self.failing.borrow_mut().insert(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    fn record(&self, op: &'static str, call: Call) -> TransportResult<()> {
        self.log.borrow_mut().push(call);
        if self.failing.borrow().contains(op) {
            return Err(TransportError::CommandFailed {
                program: op.to_string(),
                code: Some(1),
                stderr: format!("{} refused", op),
            });
        }
        Ok(())
    }
}

impl Drop for RecordingTransport {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Call::Closed);
    }
}

impl Transport for RecordingTransport {
    fn ensure_parent_dir(&self, path: &RemotePath) -> TransportResult<()> {
        self.record("mkdir", Call::Mkdir(path.to_string()))
    }

    fn copy(&self, local: &Path, remote: &RemotePath) -> TransportResult<()> {
        self.record("copy", Call::Copy(local.to_path_buf(), remote.to_string()))
    }

    fn remove(&self, remote: &RemotePath) -> TransportResult<()> {
        self.record("remove", Call::Remove(remote.to_string()))
    }

    fn move_path(&self, from: &RemotePath, to: &RemotePath) -> TransportResult<()> {
        self.record("move", Call::Move(from.to_string(), to.to_string()))
    }

    fn run_command(&self, command: &str) -> TransportResult<CommandOutput> {
        self.record("run", Call::Run(command.to_string()))?;
        Ok(CommandOutput {
            code: Some(0),
            ..CommandOutput::default()
        })
    }

    fn bulk_sync(&self, request: &BulkSync<'_>) -> TransportResult<()> {
        self.record("bulk", Call::Bulk(request.paths.clone(), request.delete))
    }
}

/// Oracle that ignores every path under the given prefixes
#[derive(Debug, Default)]
pub struct PrefixOracle {
    prefixes: Vec<String>,
    queries: Rc<RefCell<Vec<String>>>,
    broken: bool,
}

impl PrefixOracle {
    pub fn new(prefixes: &[&str]) -> Self {
        Self {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Every query fails as if the tool had vanished
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// Paths asked about so far
    pub fn queries(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.queries)
    }

    fn check(&self) -> Result<(), OracleError> {
        if self.broken {
            return Err(OracleError::Unavailable {
                tool: "git",
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(())
    }
}

impl VcsOracle for PrefixOracle {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn is_ignored(&self, path: &RelPath) -> Result<bool, OracleError> {
        self.queries.borrow_mut().push(path.to_string());
        self.check()?;
        Ok(self
            .prefixes
            .iter()
            .any(|prefix| path.as_str().starts_with(prefix.as_str())))
    }

    fn list_ignored(&self) -> Result<Vec<RelPath>, OracleError> {
        self.queries.borrow_mut().push("<all>".to_string());
        self.check()?;
        self.prefixes
            .iter()
            .map(|p| RelPath::new(p).map_err(|e| OracleError::Failed {
                tool: "git",
                code: None,
                stderr: e.to_string(),
            }))
            .collect()
    }
}

/// Plays back events, then clears the running flag
#[derive(Debug)]
pub struct ScriptedEvents {
    events: VecDeque<FsEvent>,
    running: Arc<AtomicBool>,
}

impl ScriptedEvents {
    pub fn new(events: Vec<FsEvent>, running: Arc<AtomicBool>) -> Self {
        Self {
            events: events.into(),
            running,
        }
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self, _timeout: Duration) -> Option<FsEvent> {
        let event = self.events.pop_front();
        if event.is_none() {
            self.running.store(false, Ordering::SeqCst);
        }
        event
    }
}
