//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DEFAULT_PORT;

/// Remote connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Sync behaviour defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Keep remote files that do not exist locally
    #[serde(default)]
    pub keep_extra: bool,

    /// Do not ignore any files
    #[serde(default)]
    pub include_all: bool,
}

/// Output defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print a line for every ignored change
    #[serde(default)]
    pub show_ignored: bool,
}

/// External programs, looked up on `PATH` unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_ssh")]
    pub ssh: String,
    #[serde(default = "default_rsync")]
    pub rsync: String,
    #[serde(default = "default_git")]
    pub git: String,
    #[serde(default = "default_hg")]
    pub hg: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ssh: default_ssh(),
            rsync: default_rsync(),
            git: default_git(),
            hg: default_hg(),
        }
    }
}

fn default_ssh() -> String {
    "ssh".to_string()
}

fn default_rsync() -> String {
    "rsync".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

fn default_hg() -> String {
    "hg".to_string()
}

/// Contents of a `config.toml` / `.pushsync.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Effective run settings after CLI flags are applied
///
/// Read-only once the session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    pub quiet: bool,
    pub verbose: bool,
    pub show_ignored: bool,
    pub skip_init: bool,
    pub exit_after: bool,
    pub include_all: bool,
    pub keep_extra: bool,
    pub json: bool,
}

impl SyncConfig {
    /// Defaults from the loaded configuration; CLI flags are OR-ed in afterwards
    pub fn from_config(config: &Config) -> Self {
        Self {
            show_ignored: config.output.show_ignored,
            include_all: config.sync.include_all,
            keep_extra: config.sync.keep_extra,
            ..Self::default()
        }
    }
}
