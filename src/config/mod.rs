//! Configuration module for pushsync
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (PUSHSYNC_*)
//! 3. Project config (`.pushsync.toml` at the local root, or `--config`)
//! 4. User config (`<config dir>/pushsync/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{
    load, load_layers, user_config_path, with_env_overrides,
    with_overrides_from, ConfigWarning, PROJECT_CONFIG_FILE,
};
pub use types::{Config, OutputConfig, RemoteConfig, SyncConfig, SyncSettings, ToolsConfig};

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}
