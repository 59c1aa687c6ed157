//! Diagnostic logging
//!
//! Logs go to stderr so stdout stays reserved for progress lines and NDJSON.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default level for the given CLI verbosity
pub fn default_level(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the level picked from the flags.
pub fn init(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(quiet, verbose)))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
