//! Sync target value object
//!
//! Where local files go: `host:remote_dir` over `port`, mirrored from `local_root`.

use std::fmt;
use std::path::{Path, PathBuf};

use super::RelPath;

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

/// A path on the remote host, not yet escaped for any shell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    /// Wrap a raw remote path
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The raw path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory containing this path (with trailing `/` trimmed)
    ///
    /// Returns `None` for a bare file name, which lives in the login directory.
    pub fn parent(&self) -> Option<RemotePath> {
        let trimmed = self.0.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some(("", _)) => Some(RemotePath("/".to_string())),
            Some((parent, _)) => Some(RemotePath(parent.to_string())),
            None => None,
        }
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote destination and local source for one session
///
/// Immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// `[user@]host` as understood by ssh
    host: String,
    /// Remote base directory, always ending in `/`
    remote_dir: String,
    /// SSH port
    port: u16,
    /// Local directory being mirrored
    local_root: PathBuf,
}

impl SyncTarget {
    /// Create a new target
    ///
    /// The remote directory gains a trailing `/` if missing; an empty remote
    /// directory means the remote login directory.
    pub fn new(
        host: impl Into<String>,
        remote_dir: impl Into<String>,
        port: u16,
        local_root: impl Into<PathBuf>,
    ) -> Self {
        let mut remote_dir = remote_dir.into();
        if remote_dir.is_empty() {
            remote_dir.push_str("./");
        } else if !remote_dir.ends_with('/') {
            remote_dir.push('/');
        }

        Self {
            host: host.into(),
            remote_dir,
            port,
            local_root: local_root.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    /// Remote counterpart of a relative path
    pub fn remote_path(&self, path: &RelPath) -> RemotePath {
        RemotePath(format!("{}{}", self.remote_dir, path))
    }

    /// The remote base directory itself
    pub fn remote_root(&self) -> RemotePath {
        RemotePath(self.remote_dir.clone())
    }

    /// Local counterpart of a relative path
    pub fn local_path(&self, path: &RelPath) -> PathBuf {
        path.to_local(&self.local_root)
    }

    /// `host:dir` for display
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.host, self.remote_dir)
    }
}
