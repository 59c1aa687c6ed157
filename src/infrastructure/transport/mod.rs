//! Remote transport over ssh and rsync
//!
//! - `ssh` - control-master session implementing the `Transport` port
//! - `rsync` - argument and filter-file construction

pub mod rsync;
pub mod ssh;

pub use ssh::SshSession;

/// How a session talks to the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// ssh binary
    pub ssh_program: String,
    /// rsync binary
    pub rsync_program: String,
    /// Pass `-v` to rsync and show its output
    pub verbose: bool,
    /// ssh `ControlPath` template for the master socket
    pub control_path: String,
}

impl SessionOptions {
    /// Options with a control socket unique to this process
    pub fn new(ssh_program: impl Into<String>, rsync_program: impl Into<String>) -> Self {
        Self {
            ssh_program: ssh_program.into(),
            rsync_program: rsync_program.into(),
            verbose: false,
            control_path: default_control_path(std::process::id()),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new("ssh", "rsync")
    }
}

/// `~/.ssh/pushsync-<pid>-%C`; ssh expands `%C` to a hash of the connection
pub fn default_control_path(pid: u32) -> String {
    format!("~/.ssh/pushsync-{}-%C", pid)
}
