//! Error types for pushsync
//!
//! Library code returns `PushResult`; the binary decides the exit code once.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ports::TransportError;
use crate::domain::value_objects::RelPathError;

/// Result type alias for pushsync operations
pub type PushResult<T> = Result<T, PushError>;

/// Main error type for pushsync operations
#[derive(Error, Debug)]
pub enum PushError {
    /// `--skip-init` and `--exit-after` both requested
    #[error("cannot use --skip-init and --exit-after together")]
    ConflictingFlags,

    /// Local root is missing or not a directory
    #[error("local directory not found: {path}")]
    LocalRootNotFound { path: PathBuf },

    /// Remote master connection could not be established
    #[error("could not connect to {host}: {message}")]
    Connection { host: String, message: String },

    /// Initial one-way sync failed
    #[error("initial sync failed: {0}")]
    Reconcile(#[source] TransportError),

    /// Remote operation failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Path could not be expressed relative to the local root
    #[error(transparent)]
    RelPath(#[from] RelPathError),

    /// Filesystem watcher could not be started
    #[error("failed to watch {path}: {message}")]
    Watch { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
