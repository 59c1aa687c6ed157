//! Session progress events
//!
//! Everything the engine reports goes through `PushEvent`; the presentation
//! layer renders it as human lines or NDJSON.

use serde::Serialize;

use crate::domain::value_objects::RelPath;

/// Kind of incremental action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Created,
    Modified,
    Deleted,
    Moved,
}

impl ActionKind {
    pub fn verb(self) -> &'static str {
        match self {
            ActionKind::Created => "created",
            ActionKind::Modified => "modified",
            ActionKind::Deleted => "deleted",
            ActionKind::Moved => "moved",
        }
    }
}

/// One incremental action on a relative path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Action {
    pub fn new(kind: ActionKind, path: &RelPath) -> Self {
        Self {
            kind,
            path: path.to_string(),
            to: None,
        }
    }

    pub fn moved(from: &RelPath, to: &RelPath) -> Self {
        Self {
            kind: ActionKind::Moved,
            path: from.to_string(),
            to: Some(to.to_string()),
        }
    }

    /// `src/a.rs modified`, `a moved to b`
    pub fn describe(&self) -> String {
        match &self.to {
            Some(to) => format!("{} moved to {}", self.path, to),
            None => format!("{} {}", self.path, self.kind.verb()),
        }
    }
}

/// Session progress event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PushEvent {
    /// Connection established
    SessionStarted {
        target: String,
        local_root: String,
        policy: String,
    },
    /// Initial one-way sync begins
    ReconcileStarted { excluded: usize, delete: String },
    /// Initial one-way sync finished
    ReconcileComplete,
    /// Incremental mode entered
    Waiting,
    /// A remote operation is about to run
    ActionStarted {
        #[serde(flatten)]
        action: Action,
    },
    /// The remote operation succeeded
    Pushed {
        #[serde(flatten)]
        action: Action,
    },
    /// The change was not pushed because the path is ignored
    Ignored {
        #[serde(flatten)]
        action: Action,
    },
    /// The remote operation failed; the session continues
    Failed {
        #[serde(flatten)]
        action: Action,
        error: String,
    },
    /// Session stopped
    Shutdown,
}

impl PushEvent {
    /// Convert to JSON string with "command": "push" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("push"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
