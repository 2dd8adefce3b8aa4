//! # worklink-sync
//!
//! Reconciliation engine between time entries and issue-tracker worklogs.
//!
//! Build a [`DiffGather`] once per run from settings and the known
//! time-tracking projects, then call [`DiffGather::gather_diff`] per pairing
//! or [`pipeline::run`] for a whole snapshot.

pub mod action;
pub mod compare;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod recorder;
pub mod report;
pub mod session;

pub use action::{Action, Level, Message, TimeEntryFields, WorklogChanges, WorklogFields};
pub use engine::floor_minute;
pub use error::SyncError;
pub use pipeline::{DiffScope, PairingReport};
pub use report::{group_by_day, DayReport};
pub use session::{DiffGather, PairingDiff};
