//! Wire types produced for the action executor.
//!
//! The JSON shape of [`Action`] and [`Message`] is the contract between the
//! diff engine and whatever applies the actions; field names follow the
//! external systems (`pid`, `timeSpentSeconds`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use worklink_core::types::{ExternalProjectId, IssueKey, TimeEntryId, WorklogId, WorkspaceId};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Severity of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Danger,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Level::Info, Level::Warning, Level::Danger]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "info"),
            Level::Warning => write!(f, "warning"),
            Level::Danger => write!(f, "danger"),
        }
    }
}

/// Human-readable description of one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub level: Level,
}

// ---------------------------------------------------------------------------
// Field sets
// ---------------------------------------------------------------------------

/// One normalized time-entry field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeEntryField {
    Billable(bool),
    Pid(ExternalProjectId),
    /// Encoded with the time-tracker codec.
    Start(String),
    /// Encoded with the time-tracker codec.
    Stop(String),
}

/// Pending time-entry changes; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<ExternalProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
}

impl TimeEntryFields {
    pub fn set(&mut self, field: TimeEntryField) {
        match field {
            TimeEntryField::Billable(value) => self.billable = Some(value),
            TimeEntryField::Pid(value) => self.pid = Some(value),
            TimeEntryField::Start(value) => self.start = Some(value),
            TimeEntryField::Stop(value) => self.stop = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.billable.is_none() && self.pid.is_none() && self.start.is_none() && self.stop.is_none()
    }
}

/// One worklog field. The set is closed: `started`, `timeSpentSeconds`, `comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorklogField {
    /// Encoded with the issue-tracker codec.
    Started(String),
    TimeSpentSeconds(i64),
    Comment(String),
}

impl WorklogField {
    /// Field name as the issue tracker spells it.
    pub fn name(&self) -> &'static str {
        match self {
            WorklogField::Started(_) => "started",
            WorklogField::TimeSpentSeconds(_) => "timeSpentSeconds",
            WorklogField::Comment(_) => "comment",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            WorklogField::Started(value) | WorklogField::Comment(value) => value.as_str().into(),
            WorklogField::TimeSpentSeconds(value) => (*value).into(),
        }
    }
}

/// A complete worklog payload, as sent on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogFields {
    pub started: String,
    pub time_spent_seconds: i64,
    pub comment: String,
}

/// Pending worklog changes; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl WorklogChanges {
    pub fn set(&mut self, field: WorklogField) {
        match field {
            WorklogField::Started(value) => self.started = Some(value),
            WorklogField::TimeSpentSeconds(value) => self.time_spent_seconds = Some(value),
            WorklogField::Comment(value) => self.comment = Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_none() && self.time_spent_seconds.is_none() && self.comment.is_none()
    }

    /// The complete payload, if every field has been set.
    pub fn complete(&self) -> Option<WorklogFields> {
        Some(WorklogFields {
            started: self.started.clone()?,
            time_spent_seconds: self.time_spent_seconds?,
            comment: self.comment.clone()?,
        })
    }
}

impl From<WorklogFields> for WorklogChanges {
    fn from(fields: WorklogFields) -> Self {
        Self {
            started: Some(fields.started),
            time_spent_seconds: Some(fields.time_spent_seconds),
            comment: Some(fields.comment),
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// One write to execute against an external system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    TimeEntryUpdate {
        workspace_id: WorkspaceId,
        id: TimeEntryId,
        fields: TimeEntryFields,
        issue_key: IssueKey,
    },
    WorklogDelete {
        id: WorklogId,
        issue_key: IssueKey,
    },
    WorklogCreate {
        fields: WorklogFields,
        issue_key: IssueKey,
    },
    WorklogUpdate {
        id: WorklogId,
        fields: WorklogChanges,
        issue_key: IssueKey,
    },
}

impl Action {
    pub fn issue_key(&self) -> &IssueKey {
        match self {
            Action::TimeEntryUpdate { issue_key, .. }
            | Action::WorklogDelete { issue_key, .. }
            | Action::WorklogCreate { issue_key, .. }
            | Action::WorklogUpdate { issue_key, .. } => issue_key,
        }
    }

    /// Short label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Action::TimeEntryUpdate { .. } => "update time entry",
            Action::WorklogDelete { .. } => "delete worklog",
            Action::WorklogCreate { .. } => "create worklog",
            Action::WorklogUpdate { .. } => "update worklog",
        }
    }
}
