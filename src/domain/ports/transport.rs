//! Transport port
//!
//! The remote side of a session: a handful of blocking primitives that all go
//! through one connection. Implementations must not reorder calls.

use std::path::Path;

use thiserror::Error;

use crate::domain::value_objects::{RelPath, RemotePath};

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by remote operations
#[derive(Debug, Error)]
pub enum TransportError {
    /// The local helper program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// ssh reported a connection-level failure (exit status 255)
    #[error("connection to {host} lost")]
    ConnectionLost { host: String },

    /// The remote command or transfer failed
    #[error("{program} failed ({}): {stderr}", exit_label(.code))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Temporary rsync filter file could not be written
    #[error("failed to write filter file: {0}")]
    FilterFile(#[source] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Output of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Which paths a bulk sync covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSet {
    /// Only these files (their parent directories are implied)
    Include(Vec<RelPath>),
    /// Everything except these files or directories
    Exclude(Vec<RelPath>),
}

impl PathSet {
    pub fn len(&self) -> usize {
        match self {
            PathSet::Include(paths) | PathSet::Exclude(paths) => paths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What happens to remote paths that are not part of the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Leave remote-only files alone
    Keep,
    /// Delete remote files that no longer exist locally
    Extraneous,
    /// Also delete remote copies of excluded paths
    ExtraneousAndExcluded,
}

/// One full-tree one-way transfer
#[derive(Debug, Clone)]
pub struct BulkSync<'a> {
    /// Local directory whose contents are sent
    pub local_root: &'a Path,
    /// Allow-list or deny-list of relative paths
    pub paths: PathSet,
    /// Remote deletion behaviour
    pub delete: DeleteMode,
}

/// Remote operations available to the sync engine
///
/// All calls block until the remote side confirms completion or failure.
/// Nothing is retried.
pub trait Transport {
    /// Create every missing directory above `path`
    fn ensure_parent_dir(&self, path: &RemotePath) -> TransportResult<()>;

    /// Transfer a file or directory subtree, preserving attributes
    fn copy(&self, local: &Path, remote: &RemotePath) -> TransportResult<()>;

    /// Delete a remote file; a missing file is not an error
    fn remove(&self, remote: &RemotePath) -> TransportResult<()>;

    /// Rename on the remote side
    fn move_path(&self, from: &RemotePath, to: &RemotePath) -> TransportResult<()>;

    /// Run an arbitrary (already escaped) command on the remote host
    fn run_command(&self, command: &str) -> TransportResult<CommandOutput>;

    /// Mirror the whole local root according to `request`
    fn bulk_sync(&self, request: &BulkSync<'_>) -> TransportResult<()>;
}
