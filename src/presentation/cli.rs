//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Flags only ever switch behaviour on; config files and `PUSHSYNC_*`
//!   variables supply the defaults they override
//! - `--skip-init` with `--exit-after` is rejected by the session, not by clap,
//!   so the error reads the same from every entry point

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, SyncConfig};

/// Continuously push a local working tree to a remote directory over SSH
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pushsync")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Run from the directory to mirror. Files ignored by git or hg are not pushed."
)]
pub struct Cli {
    /// Remote host, as understood by ssh
    #[arg(value_name = "USER@HOST")]
    pub host: String,

    /// Remote directory (relative paths start in the remote home directory)
    #[arg(value_name = "DEST")]
    pub dest: String,

    /// No per-file output
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose rsync output and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the initial one-way sync
    #[arg(short, long)]
    pub skip_init: bool,

    /// Print a line for ignored files (overridden by --quiet)
    #[arg(short = 'i', long)]
    pub show_ignored: bool,

    /// Exit after the initial one-way sync
    #[arg(short, long)]
    pub exit_after: bool,

    /// Do not ignore any files
    #[arg(short = 'a', long)]
    pub include_all: bool,

    /// SSH port [default: 22]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Keep remote files that do not exist locally
    #[arg(short, long)]
    pub keep_extra: bool,

    /// Output progress as NDJSON
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of .pushsync.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Run settings: config defaults with the flags applied on top
    pub fn sync_config(&self, config: &Config) -> SyncConfig {
        let defaults = SyncConfig::from_config(config);
        SyncConfig {
            quiet: self.quiet,
            verbose: self.verbose,
            show_ignored: self.show_ignored || defaults.show_ignored,
            skip_init: self.skip_init,
            exit_after: self.exit_after,
            include_all: self.include_all || defaults.include_all,
            keep_extra: self.keep_extra || defaults.keep_extra,
            json: self.json,
        }
    }

    /// Port from the flag, else the configuration
    pub fn port(&self, config: &Config) -> u16 {
        self.port.unwrap_or(config.remote.port)
    }
}
