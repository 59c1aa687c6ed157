//! Ignore-policy detection
//!
//! Runs once at startup. A control directory at the local root is the
//! strongest hint; without one each tool is asked whether the root lies
//! inside a repository. The chosen tool must answer its probe, otherwise
//! the next candidate is tried.

use std::path::Path;

use crate::config::ToolsConfig;
use crate::domain::policies::PathPolicy;
use crate::domain::value_objects::VcsKind;

use super::{GitOracle, HgOracle};

/// Which VCS governs `root`, if any
pub fn detect_vcs(root: &Path, tools: &ToolsConfig) -> Option<VcsKind> {
    let (marked, unmarked): (Vec<VcsKind>, Vec<VcsKind>) = VcsKind::ALL
        .into_iter()
        .partition(|kind| root.join(kind.control_dir()).exists());

    for kind in marked.iter().chain(unmarked.iter()).copied() {
        if probe(kind, root, tools) {
            return Some(kind);
        }
        if marked.contains(&kind) {
            tracing::warn!(
                "found {} but `{}` is not usable",
                kind.control_dir(),
                program(kind, tools)
            );
        }
    }
    None
}

/// Build the path policy for a session
pub fn detect_policy(root: &Path, include_all: bool, tools: &ToolsConfig) -> PathPolicy {
    if include_all {
        tracing::debug!("include-all set, skipping VCS detection");
        return PathPolicy::include_all();
    }

    match detect_vcs(root, tools) {
        Some(VcsKind::Git) => {
            tracing::debug!("using git to decide ignored files");
            PathPolicy::with_oracle(Box::new(GitOracle::new(&tools.git, root)))
        }
        Some(VcsKind::Hg) => {
            tracing::debug!("using hg to decide ignored files");
            PathPolicy::with_oracle(Box::new(HgOracle::new(&tools.hg, root)))
        }
        None => {
            tracing::warn!("not a git/hg repository, no files will be ignored");
            PathPolicy::none()
        }
    }
}

fn program(kind: VcsKind, tools: &ToolsConfig) -> &str {
    match kind {
        VcsKind::Git => &tools.git,
        VcsKind::Hg => &tools.hg,
    }
}

fn probe(kind: VcsKind, root: &Path, tools: &ToolsConfig) -> bool {
    match kind {
        VcsKind::Git => GitOracle::probe(program(kind, tools), root),
        VcsKind::Hg => HgOracle::probe(program(kind, tools), root),
    }
}
