//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod event_source;
pub mod transport;
pub mod vcs_oracle;

pub use event_source::EventSource;
pub use transport::{
    BulkSync, CommandOutput, DeleteMode, PathSet, Transport, TransportError, TransportResult,
};
pub use vcs_oracle::{OracleError, VcsOracle};
