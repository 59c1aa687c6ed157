//! SSH session
//!
//! Owns one ssh control master. Every remote command and every rsync run is
//! routed through its control socket, so authentication happens once.
//! The master is shut down exactly once, when the session is closed or dropped.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::domain::ports::{BulkSync, CommandOutput, Transport, TransportError, TransportResult};
use crate::domain::value_objects::{RemotePath, SyncTarget};
use crate::error::{PushError, PushResult};
use crate::infrastructure::escaping::escape_shell;

use super::rsync::{write_filter_file, RsyncArgs, OLD_ARGS_ENV};
use super::SessionOptions;

/// ssh's exit status for connection-level errors
const SSH_CONNECTION_ERROR: i32 = 255;

/// A live multiplexed connection to the remote host
#[derive(Debug)]
pub struct SshSession {
    host: String,
    port: u16,
    remote_root: RemotePath,
    options: SessionOptions,
    closed: bool,
}

impl SshSession {
    /// Start the control master in the background
    ///
    /// Blocks until ssh has authenticated (prompts go to the terminal) and
    /// fails if the host is unreachable or authentication fails.
    pub fn open(target: &SyncTarget, options: SessionOptions) -> PushResult<Self> {
        ensure_local_ssh_dir();

        let mut cmd = Command::new(&options.ssh_program);
        cmd.arg("-M")
            .arg("-S")
            .arg(&options.control_path)
            .arg("-fN")
            .arg("-p")
            .arg(target.port().to_string())
            .arg(target.host())
            .stdin(Stdio::inherit())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        tracing::debug!(command = ?cmd, "starting ssh master");

        // The forked master keeps inherited pipes open, so only wait for status.
        let status = cmd.status().map_err(|e| PushError::Connection {
            host: target.host().to_string(),
            message: format!("failed to run {}: {}", options.ssh_program, e),
        })?;

        if !status.success() {
            return Err(PushError::Connection {
                host: target.host().to_string(),
                message: match status.code() {
                    Some(code) => format!("ssh exited with status {}", code),
                    None => "ssh was terminated by a signal".to_string(),
                },
            });
        }

        tracing::info!(host = target.host(), port = target.port(), "connected");

        Ok(Self {
            host: target.host().to_string(),
            port: target.port(),
            remote_root: target.remote_root(),
            options,
            closed: false,
        })
    }

    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let result = Command::new(&self.options.ssh_program)
            .arg("-S")
            .arg(&self.options.control_path)
            .arg("-O")
            .arg("exit")
            .arg("-p")
            .arg(self.port.to_string())
            .arg(&self.host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) => tracing::debug!(?status, "ssh master stopped"),
            Err(e) => tracing::debug!(error = %e, "failed to stop ssh master"),
        }
    }

    fn ssh(&self) -> Command {
        let mut cmd = Command::new(&self.options.ssh_program);
        cmd.arg("-S")
            .arg(&self.options.control_path)
            .arg("-p")
            .arg(self.port.to_string())
            .arg(&self.host);
        cmd
    }

    fn rsync_args(&self) -> RsyncArgs<'_> {
        RsyncArgs {
            ssh_program: &self.options.ssh_program,
            control_path: &self.options.control_path,
            port: self.port,
            host: &self.host,
            verbose: self.options.verbose,
        }
    }

    /// Run a remote command and insist on success
    fn run_checked(&self, command: &str) -> TransportResult<()> {
        let output = self.run_command(command)?;
        if output.success() {
            Ok(())
        } else {
            Err(TransportError::CommandFailed {
                program: command.split_whitespace().next().unwrap_or("ssh").to_string(),
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    fn rsync(&self, args: Vec<OsString>) -> TransportResult<()> {
        let mut cmd = Command::new(&self.options.rsync_program);
        cmd.args(&args)
            .env(OLD_ARGS_ENV.0, OLD_ARGS_ENV.1)
            .stdin(Stdio::null())
            .stdout(if self.options.verbose {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::piped());

        tracing::debug!(command = ?cmd, "running rsync");

        let output = spawn_output(&mut cmd, &self.options.rsync_program)?;
        if output.status.success() {
            return Ok(());
        }

        Err(TransportError::CommandFailed {
            program: "rsync".to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Transport for SshSession {
    fn ensure_parent_dir(&self, path: &RemotePath) -> TransportResult<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        self.run_checked(&format!("mkdir -p -- {}", escape_shell(parent.as_str())))
    }

    fn copy(&self, local: &Path, remote: &RemotePath) -> TransportResult<()> {
        let args = self.rsync_args().copy(local, local.is_dir(), remote);
        self.rsync(args)
    }

    fn remove(&self, remote: &RemotePath) -> TransportResult<()> {
        self.run_checked(&format!("rm -f -- {}", escape_shell(remote.as_str())))
    }

    fn move_path(&self, from: &RemotePath, to: &RemotePath) -> TransportResult<()> {
        self.run_checked(&format!(
            "mv -f -- {} {}",
            escape_shell(from.as_str()),
            escape_shell(to.as_str())
        ))
    }

    fn run_command(&self, command: &str) -> TransportResult<CommandOutput> {
        let mut cmd = self.ssh();
        cmd.arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(command, host = %self.host, "running remote command");

        let output = spawn_output(&mut cmd, &self.options.ssh_program)?;
        if output.status.code() == Some(SSH_CONNECTION_ERROR) {
            return Err(TransportError::ConnectionLost {
                host: self.host.clone(),
            });
        }

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn bulk_sync(&self, request: &BulkSync<'_>) -> TransportResult<()> {
        let filter = write_filter_file(&request.paths)?;
        let args = self.rsync_args().bulk(
            request.local_root,
            &self.remote_root,
            filter.path(),
            request.delete,
        );
        let result = self.rsync(args);

        if let Err(e) = filter.close() {
            tracing::debug!(error = %e, "failed to remove filter file");
        }
        result
    }
}

fn spawn_output(cmd: &mut Command, program: &str) -> TransportResult<Output> {
    cmd.output().map_err(|source| TransportError::Spawn {
        program: program.to_string(),
        source,
    })
}

/// ssh refuses to create the control socket in a missing directory
fn ensure_local_ssh_dir() {
    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".ssh");
        if !dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&dir) {
                tracing::warn!(path = %dir.display(), error = %e, "failed to create ssh directory");
            }
        }
    }
}
