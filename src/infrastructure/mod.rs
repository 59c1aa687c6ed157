//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `transport/` - ssh control master and rsync (Transport)
//! - `vcs/` - git and hg ignore oracles (VcsOracle) and detection
//! - `watcher/` - notify-backed event source (EventSource)
//! - `escaping` - shell and rsync-filter escaping
//! - `backend` - the production `SessionBackend`

mod backend;
pub mod escaping;
pub mod transport;
pub mod vcs;
pub mod watcher;

pub use backend::SystemBackend;
pub use transport::{SessionOptions, SshSession};
pub use vcs::{detect_policy, GitOracle, HgOracle};
pub use watcher::NotifySource;
