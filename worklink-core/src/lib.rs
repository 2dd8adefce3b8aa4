//! Worklink core library — domain types, timestamp codecs, settings and snapshot loading.
//!
//! Public API surface:
//! - [`types`] — newtypes, records, policies
//! - [`format`] — per-system timestamp codecs
//! - [`error`] — [`ConfigError`], [`TimestampError`]
//! - [`settings`] — policy settings load / save
//! - [`snapshot`] — offline input snapshots

pub mod error;
pub mod format;
pub mod settings;
pub mod snapshot;
pub mod types;

pub use error::{ConfigError, TimestampError};
pub use format::{DateTimeFormat, ISSUE_TRACKER, TIME_TRACKER};
pub use settings::Settings;
pub use snapshot::Snapshot;
pub use types::{
    ExternalProject, ExternalProjectId, IssueKey, Pairing, ProjectKey, ProjectPolicy, TimeEntry,
    TimeEntryId, Worklog, WorklogId, WorkspaceId,
};
