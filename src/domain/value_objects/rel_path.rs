//! Relative Path Value Object
//!
//! A path below the local root, always `/`-separated:
//! - No path traversal (`..`)
//! - Never absolute
//! - No empty or `.` segments

use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Error when a relative path cannot be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelPathError {
    /// Path is empty (the root itself)
    #[error("path is empty")]
    Empty,
    /// Path is absolute when relative is required
    #[error("absolute paths are not allowed: {0}")]
    Absolute(String),
    /// Path contains traversal components (..)
    #[error("path contains traversal components: {0}")]
    Traversal(String),
    /// Path is not below the local root
    #[error("'{path}' is outside '{root}'")]
    OutsideRoot { path: PathBuf, root: PathBuf },
    /// Path is not valid UTF-8
    #[error("path is not valid UTF-8: {0}")]
    NotUtf8(PathBuf),
}

/// A validated path relative to the local root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath(String);

impl RelPath {
    /// Parse a `/`-separated relative path
    ///
    /// Redundant separators and `.` segments are dropped; a trailing `/` is
    /// accepted and removed.
    pub fn new(path: &str) -> Result<Self, RelPathError> {
        if path.starts_with('/') {
            return Err(RelPathError::Absolute(path.to_string()));
        }

        let mut segments = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(RelPathError::Traversal(path.to_string())),
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(RelPathError::Empty);
        }

        Ok(Self(segments.join("/")))
    }

    /// Express an absolute local path relative to `root`
    pub fn from_local(root: &Path, path: &Path) -> Result<Self, RelPathError> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| RelPathError::OutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| RelPathError::NotUtf8(path.to_path_buf()))?;
                    segments.push(part);
                }
                Component::CurDir => continue,
                Component::ParentDir => {
                    return Err(RelPathError::Traversal(relative.display().to_string()))
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(RelPathError::Absolute(relative.display().to_string()))
                }
            }
        }

        if segments.is_empty() {
            return Err(RelPathError::Empty);
        }

        Ok(Self(segments.join("/")))
    }

    /// The path as a `/`-separated string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First path segment (`.git` for `.git/index`)
    pub fn first_segment(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// Iterate over the path segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The containing directory, if any
    pub fn parent(&self) -> Option<RelPath> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| RelPath(parent.to_string()))
    }

    /// Join onto a local directory
    pub fn to_local(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
