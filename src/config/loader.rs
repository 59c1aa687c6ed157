//! Configuration loading
//!
//! Files are merged key by key (user, then project) before deserializing,
//! so a project file only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::Config;
use super::ConfigError;

pub use crate::domain::value_objects::PROJECT_CONFIG_FILE;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// `<config dir>/pushsync/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pushsync").join("config.toml"))
}

/// Load every configuration layer that exists
///
/// `explicit` replaces the project file and must exist. Environment
/// overrides are applied last.
pub fn load(
    local_root: &Path,
    explicit: Option<&Path>,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let mut layers = Vec::new();
    if let Some(user) = user_config_path().filter(|p| p.is_file()) {
        layers.push(user);
    }
    match explicit {
        Some(path) => layers.push(path.to_path_buf()),
        None => {
            let project = local_root.join(PROJECT_CONFIG_FILE);
            if project.is_file() {
                layers.push(project);
            }
        }
    }

    let (config, warnings) = load_layers(&layers)?;
    Ok((with_env_overrides(config), warnings))
}

/// Merge the given files in order, later files winning per key
pub fn load_layers(paths: &[PathBuf]) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let mut merged = toml::Table::new();
    let mut warnings = Vec::new();
    let mut last = PathBuf::new();

    for path in paths {
        let table = read_table(path)?;
        warnings.extend(unknown_keys(path, &table)?);
        merge_tables(&mut merged, table);
        last = path.clone();
        tracing::debug!(path = %path.display(), "loaded config layer");
    }

    let config = into_config(&last, merged)?;
    Ok((config, warnings))
}

/// Apply environment variable overrides (PUSHSYNC_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`
pub fn with_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    // PUSHSYNC_PORT
    if let Some(port) = lookup("PUSHSYNC_PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => config.remote.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid PUSHSYNC_PORT"),
        }
    }

    if let Some(val) = lookup("PUSHSYNC_KEEP_EXTRA") {
        config.sync.keep_extra = parse_flag(&val);
    }
    if let Some(val) = lookup("PUSHSYNC_INCLUDE_ALL") {
        config.sync.include_all = parse_flag(&val);
    }
    if let Some(val) = lookup("PUSHSYNC_SHOW_IGNORED") {
        config.output.show_ignored = parse_flag(&val);
    }

    if let Some(ssh) = lookup("PUSHSYNC_SSH").filter(|s| !s.is_empty()) {
        config.tools.ssh = ssh;
    }
    if let Some(rsync) = lookup("PUSHSYNC_RSYNC").filter(|s| !s.is_empty()) {
        config.tools.rsync = rsync;
    }

    config
}

fn parse_flag(val: &str) -> bool {
    let val = val.trim().to_lowercase();
    !(val.is_empty() || val == "false" || val == "0" || val == "no")
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    content.parse::<toml::Table>().map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn into_config(path: &Path, table: toml::Table) -> Result<Config, ConfigError> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn unknown_keys(path: &Path, table: &toml::Table) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let value = toml::Value::Table(table.clone());
    let _: Config = serde_ignored::deserialize(value, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let content = fs::read_to_string(path).unwrap_or_default();
    Ok(unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect())
}

/// Recursive merge; tables merge, everything else is replaced
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "remote",
        "port",
        "sync",
        "keep_extra",
        "include_all",
        "output",
        "show_ignored",
        "tools",
        "ssh",
        "rsync",
        "git",
        "hg",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
