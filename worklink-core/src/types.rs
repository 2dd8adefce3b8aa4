//! Domain types shared by the diff engine and its loaders.
//!
//! Time entries and worklogs are read-only snapshots: the engine never
//! mutates them, it only describes how the external systems should change.
//! All types are serializable/deserializable via serde.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Identifier of a time entry in the time-tracking system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeEntryId(pub u64);

impl fmt::Display for TimeEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for TimeEntryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the time-tracking workspace owning a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkspaceId(pub u64);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for WorkspaceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Numeric id of a time-tracking project (the `pid` of a time entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalProjectId(pub u64);

impl fmt::Display for ExternalProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for ExternalProjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a worklog in the issue tracker. The tracker reports ids as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorklogId(pub String);

impl fmt::Display for WorklogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorklogId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorklogId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// An issue key such as `ABC-123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IssueKey(pub String);

impl IssueKey {
    /// The issue's project key: everything before the last `-`.
    ///
    /// A key without a dash is its own project key.
    pub fn project_key(&self) -> ProjectKey {
        let project = self
            .0
            .rsplit_once('-')
            .map_or(self.0.as_str(), |(project, _)| project);
        ProjectKey::from(project)
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for IssueKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IssueKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// An issue-tracker project key such as `ABC`; the lookup key of a [`ProjectPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectKey(pub String);

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One tracked time interval tagged with a target issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    /// Description with the issue tag stripped.
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub billable: bool,
    #[serde(default)]
    pub project_pid: Option<ExternalProjectId>,
    pub issue_key: IssueKey,
    #[serde(default)]
    pub raw_fields: Map<String, Value>,
}

/// One logged-work record on an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worklog {
    pub id: WorklogId,
    pub issue_key: IssueKey,
    /// Fields as the tracker returned them: `started`, `timeSpentSeconds`, `comment`, ...
    #[serde(default)]
    pub raw_fields: Map<String, Value>,
}

impl Worklog {
    /// Raw value of a tracker field, `Null` when absent.
    pub fn raw(&self, field: &str) -> &Value {
        self.raw_fields.get(field).unwrap_or(&Value::Null)
    }
}

/// The unit of reconciliation: a time entry and the worklog matched to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    #[serde(default)]
    pub time_entry: Option<TimeEntry>,
    #[serde(default)]
    pub worklog: Option<Worklog>,
}

impl Pairing {
    /// The issue this pairing is about: the time entry's target, else the worklog's.
    pub fn issue_key(&self) -> Option<&IssueKey> {
        self.time_entry
            .as_ref()
            .map(|entry| &entry.issue_key)
            .or_else(|| self.worklog.as_ref().map(|worklog| &worklog.issue_key))
    }

    pub fn is_empty(&self) -> bool {
        self.time_entry.is_none() && self.worklog.is_none()
    }
}

// ---------------------------------------------------------------------------
// Configuration records
// ---------------------------------------------------------------------------

/// Sync rules for one issue-tracker project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPolicy {
    pub key: ProjectKey,
    /// Name of the time-tracking project entries of this key must belong to.
    #[serde(
        rename = "time_tracker_project",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mapped_project_name: Option<String>,
    #[serde(rename = "billable")]
    pub expected_billable: bool,
    #[serde(default)]
    pub skip_issue_sync: bool,
}

/// A project known to the time-tracking system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProject {
    pub name: String,
    pub id: ExternalProjectId,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
