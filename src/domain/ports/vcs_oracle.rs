//! VCS oracle port
//!
//! "Is this path ignored?" answered by a version control tool.

use thiserror::Error;

use crate::domain::value_objects::{RelPath, VcsKind};

/// Errors from querying a VCS tool
#[derive(Debug, Error)]
pub enum OracleError {
    /// The tool binary could not be started
    #[error("{tool} is not available: {source}")]
    Unavailable {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported an error
    #[error("{tool} exited with {code:?}: {stderr}")]
    Failed {
        tool: &'static str,
        code: Option<i32>,
        stderr: String,
    },
}

/// A version control tool that classifies paths
pub trait VcsOracle {
    /// Which system this is
    fn kind(&self) -> VcsKind;

    /// Is this single path ignored (or untracked and ignored)?
    fn is_ignored(&self, path: &RelPath) -> Result<bool, OracleError>;

    /// Every ignored path under the root, in one invocation
    fn list_ignored(&self) -> Result<Vec<RelPath>, OracleError>;
}
