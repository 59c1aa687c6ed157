//! Initial reconciliation
//!
//! One bulk transfer that brings the remote directory in line with the local
//! root before incremental pushing starts.

use std::collections::BTreeSet;

use crate::application::events::PushEvent;
use crate::domain::policies::PathPolicy;
use crate::domain::ports::{BulkSync, DeleteMode, PathSet, Transport};
use crate::domain::value_objects::{
    IgnorePolicy, RelPath, SyncTarget, VcsKind, PROJECT_CONFIG_FILE,
};
use crate::error::{PushError, PushResult};

/// What the bulk transfer will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Paths left out of the transfer
    pub excluded: Vec<RelPath>,
    pub delete: DeleteMode,
}

/// Runs the initial one-way sync
pub struct Reconciler<'a, T: Transport + ?Sized> {
    target: &'a SyncTarget,
    policy: &'a PathPolicy,
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> Reconciler<'a, T> {
    pub fn new(target: &'a SyncTarget, policy: &'a PathPolicy, transport: &'a T) -> Self {
        Self {
            target,
            policy,
            transport,
        }
    }

    /// Decide the exclusion list and deletion mode
    ///
    /// Control directories and the project config are always left out. With
    /// a VCS policy the oracle's ignored paths are too, and remote copies of
    /// them are deleted.
    pub fn plan(&self, keep_extra: bool) -> ReconcilePlan {
        let mut excluded: BTreeSet<RelPath> = VcsKind::ALL
            .iter()
            .map(|kind| kind.control_dir())
            .chain([PROJECT_CONFIG_FILE])
            .filter_map(|name| RelPath::new(name).ok())
            .collect();

        if let Some(ignored) = self.policy.list_ignored_and_untracked() {
            excluded.extend(ignored);
        }

        // Read after listing: a failed listing has degraded the policy
        let delete = match (keep_extra, self.policy.policy()) {
            (true, _) => DeleteMode::Keep,
            (false, IgnorePolicy::Vcs(_)) => DeleteMode::ExtraneousAndExcluded,
            (false, IgnorePolicy::None) => DeleteMode::Extraneous,
        };

        ReconcilePlan {
            excluded: excluded.into_iter().collect(),
            delete,
        }
    }

    /// Plan and run the bulk transfer
    pub fn reconcile<F>(&self, keep_extra: bool, on_event: &mut F) -> PushResult<ReconcilePlan>
    where
        F: FnMut(PushEvent),
    {
        let plan = self.plan(keep_extra);

        tracing::debug!(
            excluded = plan.excluded.len(),
            delete = ?plan.delete,
            "starting initial sync"
        );
        on_event(PushEvent::ReconcileStarted {
            excluded: plan.excluded.len(),
            delete: delete_label(plan.delete).to_string(),
        });

        let request = BulkSync {
            local_root: self.target.local_root(),
            paths: PathSet::Exclude(plan.excluded.clone()),
            delete: plan.delete,
        };
        self.transport
            .bulk_sync(&request)
            .map_err(PushError::Reconcile)?;

        on_event(PushEvent::ReconcileComplete);
        Ok(plan)
    }
}

fn delete_label(mode: DeleteMode) -> &'static str {
    match mode {
        DeleteMode::Keep => "keep",
        DeleteMode::Extraneous => "extraneous",
        DeleteMode::ExtraneousAndExcluded => "extraneous_and_excluded",
    }
}
