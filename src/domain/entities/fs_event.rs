//! Filesystem event entity
//!
//! What the watcher reports, already reduced to the four kinds the
//! dispatcher knows how to push.

use std::path::{Path, PathBuf};

/// Kind of change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEventKind {
    Created,
    Modified,
    Deleted,
    /// Renamed; the event path is the source
    Moved { to: PathBuf },
}

impl FsEventKind {
    /// Verb used in progress lines
    pub fn verb(&self) -> &'static str {
        match self {
            FsEventKind::Created => "created",
            FsEventKind::Modified => "modified",
            FsEventKind::Deleted => "deleted",
            FsEventKind::Moved { .. } => "moved",
        }
    }
}

/// A single change below the watched root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    /// What happened
    pub kind: FsEventKind,
    /// Absolute path (source path for moves)
    pub path: PathBuf,
    /// The event concerns a directory
    pub is_dir: bool,
}

impl FsEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::file(FsEventKind::Created, path)
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::file(FsEventKind::Modified, path)
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::file(FsEventKind::Deleted, path)
    }

    pub fn moved(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self::file(FsEventKind::Moved { to: to.into() }, from)
    }

    fn file(kind: FsEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            is_dir: false,
        }
    }

    /// Mark this event as concerning a directory
    pub fn for_dir(mut self) -> Self {
        self.is_dir = true;
        self
    }

    /// Destination path for moves
    pub fn destination(&self) -> Option<&Path> {
        match &self.kind {
            FsEventKind::Moved { to } => Some(to),
            _ => None,
        }
    }
}
