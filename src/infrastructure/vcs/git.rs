//! Git ignore oracle

use std::path::{Path, PathBuf};

use crate::domain::ports::{OracleError, VcsOracle};
use crate::domain::value_objects::{RelPath, VcsKind};

use super::{parse_nul_list, run_tool};

/// Asks `git ls-files` which untracked paths are ignored
#[derive(Debug, Clone)]
pub struct GitOracle {
    program: String,
    root: PathBuf,
}

impl GitOracle {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }

    /// Is `root` inside a git work tree?
    pub fn probe(program: &str, root: &Path) -> bool {
        match run_tool(
            program,
            VcsKind::Git,
            root,
            &["rev-parse", "--is-inside-work-tree"],
        ) {
            Ok(stdout) => String::from_utf8_lossy(&stdout).trim() == "true",
            Err(e) => {
                tracing::debug!(error = %e, "git probe failed");
                false
            }
        }
    }
}

impl VcsOracle for GitOracle {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn is_ignored(&self, path: &RelPath) -> Result<bool, OracleError> {
        // The path is a file name, not a pattern: `notes*` must not match `notes.log`
        let stdout = run_tool(
            &self.program,
            VcsKind::Git,
            &self.root,
            &[
                "--literal-pathspecs",
                "ls-files",
                "-z",
                "-i",
                "-o",
                "--exclude-standard",
                "--",
                path.as_str(),
            ],
        )?;
        Ok(!stdout.is_empty())
    }

    fn list_ignored(&self) -> Result<Vec<RelPath>, OracleError> {
        // --directory collapses fully ignored directories into one entry
        let stdout = run_tool(
            &self.program,
            VcsKind::Git,
            &self.root,
            &[
                "ls-files",
                "-z",
                "-i",
                "-o",
                "--exclude-standard",
                "--directory",
            ],
        )?;
        Ok(parse_nul_list(&stdout))
    }
}
