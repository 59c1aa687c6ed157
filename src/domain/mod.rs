//! Domain Layer
//!
//! The sync-decision core - pure rules without direct I/O.
//!
//! ## Structure
//!
//! - `entities/` - Filesystem events as the dispatcher sees them
//! - `value_objects/` - Immutable value types (RelPath, SyncTarget, IgnorePolicy)
//! - `policies/` - Decision rules (PathPolicy)
//! - `ports/` - Interface definitions for infrastructure (Transport, VcsOracle, EventSource)
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod policies;
pub mod ports;
pub mod value_objects;
