//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Progress output (text/NDJSON)

pub mod cli;
pub mod output;

pub use cli::Cli;
pub use output::{OutputOptions, ProgressPrinter};
