//! Path Policy
//!
//! Decides whether a relative path is pushed or ignored.
//!
//! Control directories (`.git/`, `.hg/`) and the project config file are
//! rejected before any oracle is consulted; the oracle often cannot see them. An oracle that fails
//! degrades the policy to `None` for the rest of the run, with one warning.

use std::cell::Cell;
use std::collections::BTreeSet;

use crate::domain::ports::{OracleError, VcsOracle};
use crate::domain::value_objects::{IgnorePolicy, RelPath, VcsKind, PROJECT_CONFIG_FILE};

/// Ignore decisions for one session
pub struct PathPolicy {
    oracle: Option<Box<dyn VcsOracle>>,
    include_all: bool,
    degraded: Cell<bool>,
}

impl std::fmt::Debug for PathPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathPolicy")
            .field("policy", &self.policy())
            .field("include_all", &self.include_all)
            .field("degraded", &self.degraded.get())
            .finish()
    }
}

impl PathPolicy {
    /// Ignore nothing at all, not even control directories
    pub fn include_all() -> Self {
        Self {
            oracle: None,
            include_all: true,
            degraded: Cell::new(false),
        }
    }

    /// No VCS available: only control directories are ignored
    pub fn none() -> Self {
        Self {
            oracle: None,
            include_all: false,
            degraded: Cell::new(false),
        }
    }

    /// Ask `oracle` about every path outside the control directories
    pub fn with_oracle(oracle: Box<dyn VcsOracle>) -> Self {
        Self {
            oracle: Some(oracle),
            include_all: false,
            degraded: Cell::new(false),
        }
    }

    /// The policy currently in effect
    pub fn policy(&self) -> IgnorePolicy {
        match self.active_oracle() {
            Some(oracle) => IgnorePolicy::Vcs(oracle.kind()),
            None => IgnorePolicy::None,
        }
    }

    /// Has the oracle failed and been switched off?
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    /// Is this path local state that never leaves the machine?
    pub fn is_local_only(path: &RelPath) -> bool {
        VcsKind::is_control_dir(path.first_segment()) || path.as_str() == PROJECT_CONFIG_FILE
    }

    /// Should changes to `path` be ignored?
    pub fn is_ignored(&self, path: &RelPath) -> bool {
        if let Some(answer) = self.classify_without_oracle(path) {
            return answer;
        }

        let Some(oracle) = self.active_oracle() else {
            return false;
        };

        match oracle.is_ignored(path) {
            Ok(ignored) => ignored,
            Err(e) => {
                self.degrade(&e);
                false
            }
        }
    }

    /// The answer available without running the oracle, if any
    ///
    /// Deleted paths can only be classified this way: the oracle has nothing
    /// left to look at.
    pub fn classify_without_oracle(&self, path: &RelPath) -> Option<bool> {
        if self.include_all {
            return Some(false);
        }
        if Self::is_local_only(path) {
            return Some(true);
        }
        if self.active_oracle().is_none() {
            return Some(false);
        }
        None
    }

    /// Every ignored path under the root, from a single oracle call
    ///
    /// Returns `None` when no oracle is in effect (or it just failed).
    pub fn list_ignored_and_untracked(&self) -> Option<BTreeSet<RelPath>> {
        let oracle = self.active_oracle()?;
        match oracle.list_ignored() {
            Ok(paths) => Some(paths.into_iter().collect()),
            Err(e) => {
                self.degrade(&e);
                None
            }
        }
    }

    fn active_oracle(&self) -> Option<&dyn VcsOracle> {
        if self.degraded.get() {
            return None;
        }
        self.oracle.as_deref()
    }

    fn degrade(&self, error: &OracleError) {
        if !self.degraded.replace(true) {
            tracing::warn!(
                error = %error,
                "ignore oracle unavailable, no files will be ignored from now on"
            );
        }
    }
}
