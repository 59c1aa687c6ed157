//! Application Layer
//!
//! Use cases that orchestrate the sync flow.
//! This layer:
//! - Depends on Domain layer (entities, policies, ports)
//! - Does NOT talk to ssh, rsync or the filesystem directly
//! - Reports progress as `PushEvent`s
//!
//! ## Use Cases
//!
//! - `SessionController` - startup, teardown and the incremental loop
//! - `Reconciler` - the initial one-way sync
//! - `EventDispatcher` - one filesystem event to remote operations

pub mod dispatch;
pub mod events;
pub mod reconcile;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{DispatchOutcome, DispatchStats, EventDispatcher, POLL_INTERVAL};
pub use events::{Action, ActionKind, PushEvent};
pub use reconcile::{ReconcilePlan, Reconciler};
pub use session::{SessionBackend, SessionController, SessionOutcome};
