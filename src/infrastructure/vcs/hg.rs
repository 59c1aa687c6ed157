//! Mercurial ignore oracle

use std::path::{Path, PathBuf};

use crate::domain::ports::{OracleError, VcsOracle};
use crate::domain::value_objects::{RelPath, VcsKind};

use super::{parse_nul_list, run_tool};

/// Asks `hg status -i` which paths are ignored
#[derive(Debug, Clone)]
pub struct HgOracle {
    program: String,
    root: PathBuf,
}

impl HgOracle {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }

    /// Is `root` inside a Mercurial repository?
    pub fn probe(program: &str, root: &Path) -> bool {
        match run_tool(program, VcsKind::Hg, root, &["root"]) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "hg probe failed");
                false
            }
        }
    }
}

impl VcsOracle for HgOracle {
    fn kind(&self) -> VcsKind {
        VcsKind::Hg
    }

    fn is_ignored(&self, path: &RelPath) -> Result<bool, OracleError> {
        // hg reads bare command-line paths as globs
        let literal = literal_pattern(path);
        let stdout = run_tool(
            &self.program,
            VcsKind::Hg,
            &self.root,
            &["status", "-i", "-n", "-0", "--", &literal],
        )?;
        Ok(!stdout.is_empty())
    }

    fn list_ignored(&self) -> Result<Vec<RelPath>, OracleError> {
        // An explicit pattern makes hg print paths relative to the working directory
        let stdout = run_tool(
            &self.program,
            VcsKind::Hg,
            &self.root,
            &["status", "-i", "-n", "-0", "--", "."],
        )?;
        Ok(parse_nul_list(&stdout))
    }
}

/// `relpath:` pattern naming exactly `path` below the working directory
fn literal_pattern(path: &RelPath) -> String {
    format!("relpath:{}", path)
}
