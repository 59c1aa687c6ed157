//! pushsync CLI - continuous one-way sync to a remote directory
//!
//! Usage: pushsync [OPTIONS] <USER@HOST> <DEST>
//!
//! Mirrors the current directory to DEST on the remote host, then keeps
//! pushing every change until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;

use pushsync::config;
use pushsync::infrastructure::SystemBackend;
use pushsync::presentation::{Cli, OutputOptions, ProgressPrinter};
use pushsync::{PushError, SessionController, SessionOutcome, SyncTarget};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = pushsync::logging::init(cli.quiet, cli.verbose) {
        eprintln!("warning: logging unavailable: {}", e);
    }

    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let root = cwd
        .canonicalize()
        .map_err(|_| PushError::LocalRootNotFound { path: cwd.clone() })?;

    let (config, warnings) = config::load(&root, cli.config.as_deref())?;
    for warning in &warnings {
        match &warning.suggestion {
            Some(suggestion) => tracing::warn!(
                file = %warning.file.display(),
                line = warning.line,
                "unknown config key '{}' (did you mean '{}'?)",
                warning.key,
                suggestion
            ),
            None => tracing::warn!(
                file = %warning.file.display(),
                line = warning.line,
                "unknown config key '{}'",
                warning.key
            ),
        }
    }

    let sync = cli.sync_config(&config);
    let target = SyncTarget::new(&cli.host, &cli.dest, cli.port(&config), &root);

    // Set up Ctrl+C / SIGTERM handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install the interrupt handler")?;

    let backend = SystemBackend::new(config.tools.clone(), sync.verbose);
    let options = OutputOptions::from_config(&sync, std::io::stdout().is_terminal());
    let mut printer = ProgressPrinter::new(std::io::stdout(), options);

    let controller = SessionController::new(target, sync, running);
    let outcome = controller.run(&backend, |event| {
        if let Err(e) = printer.handle(&event) {
            tracing::debug!(error = %e, "failed to write progress");
        }
    })?;

    if let SessionOutcome::Stopped(stats) = outcome {
        tracing::debug!(
            pushed = stats.pushed,
            ignored = stats.ignored,
            failed = stats.failed,
            "session finished"
        );
    }

    Ok(())
}
