//! Rsync invocation
//!
//! Builds rsync argument lists that tunnel through the session's ssh master,
//! and writes the temporary filter file used by bulk transfers.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::ports::{DeleteMode, PathSet, TransportError, TransportResult};
use crate::domain::value_objects::{RelPath, RemotePath};
use crate::infrastructure::escaping::{escape_filter_pattern, escape_shell};

/// Makes rsync >= 3.2.4 treat remote paths the old way, i.e. through the
/// remote shell, so pre-escaped destinations mean the same on every version.
pub const OLD_ARGS_ENV: (&str, &str) = ("RSYNC_OLD_ARGS", "1");

/// Argument builder for one session
#[derive(Debug, Clone)]
pub struct RsyncArgs<'a> {
    /// ssh program used as rsync's remote shell
    pub ssh_program: &'a str,
    /// ssh control socket of the session
    pub control_path: &'a str,
    pub port: u16,
    pub host: &'a str,
    pub verbose: bool,
}

impl RsyncArgs<'_> {
    /// Value for rsync's `-e` option
    pub fn remote_shell(&self) -> String {
        format!(
            "{} -S {} -p {}",
            quote_for_rsync(self.ssh_program),
            quote_for_rsync(self.control_path),
            self.port
        )
    }

    fn common(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-az".into()];
        if self.verbose {
            args.push("-v".into());
        }
        args.push("-e".into());
        args.push(self.remote_shell().into());
        args
    }

    fn destination(&self, remote: &RemotePath) -> OsString {
        format!("{}:{}", self.host, escape_shell(remote.as_str())).into()
    }

    /// Arguments for copying one file or directory
    ///
    /// Directories get a trailing `/` so their contents land in `remote`
    /// instead of a nested directory.
    pub fn copy(&self, local: &Path, is_dir: bool, remote: &RemotePath) -> Vec<OsString> {
        let mut args = self.common();
        args.push(source_arg(local, is_dir));
        args.push(self.destination(remote));
        args
    }

    /// Arguments for a full-tree transfer driven by `filter_file`
    pub fn bulk(
        &self,
        local_root: &Path,
        remote_root: &RemotePath,
        filter_file: &Path,
        delete: DeleteMode,
    ) -> Vec<OsString> {
        let mut args = self.common();

        let mut filter = OsString::from("--exclude-from=");
        filter.push(filter_file.as_os_str());
        args.push(filter);

        match delete {
            DeleteMode::Keep => {}
            DeleteMode::Extraneous => args.push("--delete".into()),
            DeleteMode::ExtraneousAndExcluded => {
                args.push("--delete".into());
                args.push("--delete-excluded".into());
            }
        }

        args.push(source_arg(local_root, true));
        args.push(self.destination(remote_root));
        args
    }
}

fn source_arg(local: &Path, is_dir: bool) -> OsString {
    let mut source = local.as_os_str().to_os_string();
    if is_dir && !local.as_os_str().to_string_lossy().ends_with('/') {
        source.push("/");
    }
    source
}

/// rsync splits `-e` on spaces but honours quotes
///
/// Inside a quoted word rsync reads a doubled quote character as one
/// literal quote.
fn quote_for_rsync(word: &str) -> String {
    if word.contains([' ', '\'', '"']) {
        format!("'{}'", word.replace('\'', "''"))
    } else {
        word.to_string()
    }
}

/// Filter rules for a path set, one per line
///
/// Exclusions become `- /path`. Inclusions become `+ /path`, preceded by
/// `+ /dir/` for every ancestor and followed by a final `- *`.
pub fn filter_rules(paths: &PathSet) -> Vec<String> {
    match paths {
        PathSet::Exclude(paths) => paths
            .iter()
            .filter_map(pattern_or_warn)
            .map(|pattern| format!("- {}", pattern))
            .collect(),
        PathSet::Include(paths) => {
            let mut rules = Vec::new();
            let mut seen_dirs = BTreeSet::new();
            for path in paths {
                let Some(pattern) = pattern_or_warn(path) else {
                    continue;
                };
                let mut ancestors = Vec::new();
                let mut current = path.parent();
                while let Some(dir) = current {
                    current = dir.parent();
                    ancestors.push(dir);
                }
                for dir in ancestors.into_iter().rev() {
                    if seen_dirs.insert(dir.clone()) {
                        if let Some(dir_pattern) = escape_filter_pattern(dir.as_str()) {
                            rules.push(format!("+ {}/", dir_pattern));
                        }
                    }
                }
                rules.push(format!("+ {}", pattern));
            }
            rules.push("- *".to_string());
            rules
        }
    }
}

fn pattern_or_warn(path: &RelPath) -> Option<String> {
    let pattern = escape_filter_pattern(path.as_str());
    if pattern.is_none() {
        tracing::warn!(path = %path.as_str().escape_debug(), "cannot express path as an rsync filter, skipping");
    }
    pattern
}

/// Write the filter rules to a temporary file
///
/// The file is removed when the returned handle drops.
pub fn write_filter_file(paths: &PathSet) -> TransportResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("pushsync-filter-")
        .suffix(".txt")
        .tempfile()
        .map_err(TransportError::FilterFile)?;

    for rule in filter_rules(paths) {
        writeln!(file, "{}", rule).map_err(TransportError::FilterFile)?;
    }
    file.flush().map_err(TransportError::FilterFile)?;

    Ok(file)
}
