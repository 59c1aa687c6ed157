//! Event dispatch
//!
//! Turns filesystem events into remote operations, one event at a time.

mod dispatcher;

pub use dispatcher::{DispatchOutcome, DispatchStats, EventDispatcher, POLL_INTERVAL};
