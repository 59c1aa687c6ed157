//! Shared helpers for integration tests.
//!
//! `FakeTools` writes stand-in `ssh` and `rsync` scripts that record their
//! arguments instead of touching the network, and `TestEnv` runs the
//! pushsync binary against them with HOME and the config dir isolated.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Recording `ssh`/`rsync` replacements
pub struct FakeTools {
    pub ssh: PathBuf,
    pub rsync: PathBuf,
    log: PathBuf,
    filters: PathBuf,
}

impl FakeTools {
    /// Tools that succeed at everything
    pub fn new(dir: &Path) -> Self {
        Self::with_master_status(dir, 0)
    }

    /// Tools whose `ssh -M` exits with `status`
    pub fn with_master_status(dir: &Path, status: i32) -> Self {
        let bin = dir.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let log = dir.join("calls.log");
        let filters = dir.join("filters.log");

        let ssh = bin.join("ssh");
        write_script(
            &ssh,
            &format!(
                r#"#!/bin/sh
printf 'ssh' >> "{log}"
for a in "$@"; do printf ' %s' "$a" >> "{log}"; done
printf '\n' >> "{log}"
if [ "${{1-}}" = "-M" ]; then
  exit {status}
fi
exit 0
"#,
                log = log.display(),
                status = status
            ),
        );

        let rsync = bin.join("rsync");
        write_script(
            &rsync,
            &format!(
                r#"#!/bin/sh
printf 'rsync RSYNC_OLD_ARGS=%s' "${{RSYNC_OLD_ARGS-}}" >> "{log}"
for a in "$@"; do
  printf ' %s' "$a" >> "{log}"
  case "$a" in
    --exclude-from=*) cat "${{a#--exclude-from=}}" >> "{filters}" ;;
  esac
done
printf '\n' >> "{log}"
exit 0
"#,
                log = log.display(),
                filters = filters.display()
            ),
        );

        Self {
            ssh,
            rsync,
            log,
            filters,
        }
    }

    /// Every recorded invocation, one per line
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Filter rules rsync was handed
    pub fn filter_rules(&self) -> Vec<String> {
        fs::read_to_string(&self.filters)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Isolated project, home and tool directories
pub struct TestEnv {
    pub project: TempDir,
    pub home: TempDir,
    pub tools: FakeTools,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_master_status(0)
    }

    pub fn with_master_status(status: i32) -> Self {
        let home = tempfile::tempdir().unwrap();
        let tools = FakeTools::with_master_status(home.path(), status);
        Self {
            project: tempfile::tempdir().unwrap(),
            home,
            tools,
        }
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Run pushsync from the project root
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pushsync"))
            .args(args)
            .current_dir(self.project.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("PUSHSYNC_SSH", &self.tools.ssh)
            .env("PUSHSYNC_RSYNC", &self.tools.rsync)
            .env_remove("PUSHSYNC_PORT")
            .env_remove("PUSHSYNC_KEEP_EXTRA")
            .env_remove("PUSHSYNC_INCLUDE_ALL")
            .env_remove("PUSHSYNC_SHOW_IGNORED")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
