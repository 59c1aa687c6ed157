//! Ignore policy value object
//!
//! Which oracle, if any, decides whether a path is pushed.

use std::fmt;

/// Project config file name; read at the local root, never pushed
pub const PROJECT_CONFIG_FILE: &str = ".pushsync.toml";

/// Version control systems that can act as an ignore oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Hg,
}

impl VcsKind {
    /// All supported systems, in detection order
    pub const ALL: [VcsKind; 2] = [VcsKind::Git, VcsKind::Hg];

    /// Name of the control directory at the repository root
    pub fn control_dir(self) -> &'static str {
        match self {
            VcsKind::Git => ".git",
            VcsKind::Hg => ".hg",
        }
    }

    /// Command-line tool name
    pub fn tool(self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
        }
    }

    /// Is `segment` the control directory of any supported system?
    pub fn is_control_dir(segment: &str) -> bool {
        Self::ALL.iter().any(|kind| kind.control_dir() == segment)
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool())
    }
}

/// Policy selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IgnorePolicy {
    /// Nothing is ignored beyond control directories
    #[default]
    None,
    /// A VCS tool decides
    Vcs(VcsKind),
}

impl IgnorePolicy {
    /// The backing VCS, if any
    pub fn vcs(&self) -> Option<VcsKind> {
        match self {
            IgnorePolicy::None => None,
            IgnorePolicy::Vcs(kind) => Some(*kind),
        }
    }
}

impl fmt::Display for IgnorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnorePolicy::None => f.write_str("none"),
            IgnorePolicy::Vcs(kind) => write!(f, "{}", kind),
        }
    }
}
