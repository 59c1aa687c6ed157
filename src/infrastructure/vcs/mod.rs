//! VCS ignore oracles
//!
//! - `git` / `hg` - `VcsOracle` implementations backed by the command-line tools
//! - `detect` - startup probing that picks one of them

mod detect;
mod git;
mod hg;

use std::path::Path;
use std::process::{Command, Stdio};

pub use detect::{detect_policy, detect_vcs};
pub use git::GitOracle;
pub use hg::HgOracle;

use crate::domain::ports::OracleError;
use crate::domain::value_objects::{RelPath, VcsKind};

/// Run a VCS tool in `root` and return its stdout
fn run_tool(program: &str, kind: VcsKind, root: &Path, args: &[&str]) -> Result<Vec<u8>, OracleError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(command = ?cmd, "querying {}", kind);

    let output = cmd.output().map_err(|source| OracleError::Unavailable {
        tool: kind.tool(),
        source,
    })?;

    if !output.status.success() {
        return Err(OracleError::Failed {
            tool: kind.tool(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

/// Split NUL-terminated tool output into relative paths
///
/// Entries that are not valid relative paths are skipped.
fn parse_nul_list(output: &[u8]) -> Vec<RelPath> {
    output
        .split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let text = String::from_utf8_lossy(entry);
            match RelPath::new(&text) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::debug!(entry = %text, error = %e, "skipping oracle entry");
                    None
                }
            }
        })
        .collect()
}
