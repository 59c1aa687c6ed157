//! Domain Policies
//!
//! Pure decision rules used by the application layer.

mod path_policy;

pub use path_policy::PathPolicy;
