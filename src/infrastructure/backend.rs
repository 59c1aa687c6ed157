//! Production session backend
//!
//! Wires the real ssh transport, VCS oracles and notify watcher into the
//! session controller.

use std::path::Path;

use crate::application::SessionBackend;
use crate::config::ToolsConfig;
use crate::domain::policies::PathPolicy;
use crate::domain::value_objects::SyncTarget;
use crate::error::PushResult;

use super::transport::{SessionOptions, SshSession};
use super::vcs::detect_policy;
use super::watcher::NotifySource;

/// Real programs and the real filesystem
#[derive(Debug, Clone)]
pub struct SystemBackend {
    tools: ToolsConfig,
    verbose: bool,
}

impl SystemBackend {
    pub fn new(tools: ToolsConfig, verbose: bool) -> Self {
        Self { tools, verbose }
    }
}

impl SessionBackend for SystemBackend {
    type Transport = SshSession;
    type Events = NotifySource;

    fn detect_policy(&self, root: &Path, include_all: bool) -> PathPolicy {
        detect_policy(root, include_all, &self.tools)
    }

    fn open_transport(&self, target: &SyncTarget) -> PushResult<SshSession> {
        let options =
            SessionOptions::new(&self.tools.ssh, &self.tools.rsync).with_verbose(self.verbose);
        SshSession::open(target, options)
    }

    fn watch(&self, root: &Path) -> PushResult<NotifySource> {
        NotifySource::start(root)
    }
}
