//! Event source port
//!
//! An ordered stream of filesystem events.

use std::time::Duration;

use crate::domain::entities::FsEvent;

/// Ordered stream of filesystem events
pub trait EventSource {
    /// Next event, waiting at most `timeout`
    ///
    /// Returns `None` when nothing arrived in time.
    fn next_event(&mut self, timeout: Duration) -> Option<FsEvent>;
}
