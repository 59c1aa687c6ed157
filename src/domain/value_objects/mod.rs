//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod ignore_policy;
mod rel_path;
mod sync_target;

pub use ignore_policy::{IgnorePolicy, VcsKind, PROJECT_CONFIG_FILE};
pub use rel_path::{RelPath, RelPathError};
pub use sync_target::{RemotePath, SyncTarget, DEFAULT_PORT};
