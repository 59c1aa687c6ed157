//! pushsync - continuous one-way sync to a remote directory
//!
//! Watches a local working tree and mirrors every change to a remote
//! directory over one multiplexed ssh connection. Files the local git or
//! Mercurial repository ignores are not pushed.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

// Re-exports for convenience
pub use application::{PushEvent, SessionController, SessionOutcome};
pub use config::{Config, SyncConfig};
pub use domain::value_objects::SyncTarget;
pub use error::{PushError, PushResult};
