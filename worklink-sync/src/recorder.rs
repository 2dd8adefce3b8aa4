//! Per-pairing accumulator of intended writes and messages.
//!
//! The decision engine records what it wants; [`ActionRecorder::serialize`]
//! decides the emission order:
//!
//! 1. `TimeEntryUpdate` — if any time-entry field was recorded
//! 2. `WorklogDelete` — if the delete flag is set
//! 3. `WorklogCreate` — if the create flag is set, regardless of delete
//! 4. `WorklogUpdate` — otherwise, if nothing was deleted and fields are pending
//!
//! Delete before create keeps a move to another issue expressible as two
//! ordered actions.

use worklink_core::types::{IssueKey, Pairing, TimeEntryId, WorklogId, WorkspaceId};

use crate::action::{
    Action, Level, Message, TimeEntryField, TimeEntryFields, WorklogChanges, WorklogField,
    WorklogFields,
};

/// Identifying keys of the time entry under reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TimeEntryKeys {
    id: TimeEntryId,
    workspace_id: WorkspaceId,
    /// The issue the pairing should target.
    issue_key: IssueKey,
}

/// Identifying keys of the existing worklog.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WorklogKeys {
    id: WorklogId,
    /// The issue the worklog currently belongs to.
    issue_key: IssueKey,
}

#[derive(Debug, Default)]
pub struct ActionRecorder {
    messages: Vec<Message>,
    time_entry: Option<TimeEntryKeys>,
    worklog: Option<WorklogKeys>,
    time_entry_updates: TimeEntryFields,
    worklog_create: bool,
    worklog_delete: bool,
    worklog_updates: WorklogChanges,
}

impl ActionRecorder {
    /// A fresh recorder seeded with the keys of whichever sides are present.
    pub fn new(pairing: &Pairing) -> Self {
        Self {
            time_entry: pairing.time_entry.as_ref().map(|entry| TimeEntryKeys {
                id: entry.id,
                workspace_id: entry.workspace_id,
                issue_key: entry.issue_key.clone(),
            }),
            worklog: pairing.worklog.as_ref().map(|worklog| WorklogKeys {
                id: worklog.id.clone(),
                issue_key: worklog.issue_key.clone(),
            }),
            ..Self::default()
        }
    }

    pub fn record_message(&mut self, text: impl Into<String>, level: Level) {
        self.messages.push(Message {
            text: text.into(),
            level,
        });
    }

    /// Queue a time-entry field; a second write to the same field replaces the first.
    pub fn update_time_entry(&mut self, field: TimeEntryField) {
        debug_assert!(self.time_entry.is_some(), "time-entry update without a time entry");
        self.time_entry_updates.set(field);
    }

    pub fn update_worklog(&mut self, field: WorklogField) {
        self.worklog_updates.set(field);
    }

    /// Mark the worklog for creation with a complete payload.
    pub fn create_worklog(&mut self, fields: WorklogFields) {
        debug_assert!(self.time_entry.is_some(), "worklog creation without a time entry");
        self.worklog_create = true;
        self.worklog_updates = fields.into();
    }

    pub fn delete_worklog(&mut self) {
        debug_assert!(self.worklog.is_some(), "worklog deletion without a worklog");
        self.worklog_delete = true;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consume the recorder into its ordered action list and messages.
    ///
    /// Actions naming a record absent from the pairing are never emitted.
    pub fn serialize(self) -> (Vec<Action>, Vec<Message>) {
        let mut actions = Vec::new();

        if let Some(entry) = self.time_entry.as_ref() {
            if !self.time_entry_updates.is_empty() {
                actions.push(Action::TimeEntryUpdate {
                    workspace_id: entry.workspace_id,
                    id: entry.id,
                    fields: self.time_entry_updates,
                    issue_key: entry.issue_key.clone(),
                });
            }
        }

        if self.worklog_delete {
            if let Some(worklog) = self.worklog.as_ref() {
                actions.push(Action::WorklogDelete {
                    id: worklog.id.clone(),
                    issue_key: worklog.issue_key.clone(),
                });
            }
        }

        if self.worklog_create {
            if let (Some(entry), Some(fields)) =
                (self.time_entry.as_ref(), self.worklog_updates.complete())
            {
                actions.push(Action::WorklogCreate {
                    fields,
                    issue_key: entry.issue_key.clone(),
                });
            }
        } else if !self.worklog_delete && !self.worklog_updates.is_empty() {
            if let (Some(entry), Some(worklog)) = (self.time_entry.as_ref(), self.worklog.as_ref())
            {
                actions.push(Action::WorklogUpdate {
                    id: worklog.id.clone(),
                    fields: self.worklog_updates,
                    issue_key: entry.issue_key.clone(),
                });
            }
        }

        (actions, self.messages)
    }
}
