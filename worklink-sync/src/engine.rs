//! The decision engine: one pairing in, recorded intentions out.
//!
//! Rule order:
//! 1. no time entry → delete any worklog
//! 2. unconfigured project → skip
//! 3. billability
//! 4. time-tracking project
//! 5. minute alignment of start/stop
//! 6. skip-sync gate (policy, or a missing timestamp)
//! 7. expected worklog
//! 8. create when missing
//! 9. move when on another issue
//! 10. per-field reconciliation

use chrono::{DateTime, Duration, Timelike, Utc};
use serde_json::Value;

use worklink_core::{
    types::{TimeEntry, Worklog},
    ISSUE_TRACKER, TIME_TRACKER,
};

use crate::action::{Level, TimeEntryField, WorklogField, WorklogFields};
use crate::compare::{differs, identity, issue_timestamp};
use crate::recorder::ActionRecorder;
use crate::session::DiffGather;

/// Truncate seconds and sub-second precision.
pub fn floor_minute(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        - Duration::seconds(i64::from(timestamp.second()))
        - Duration::nanoseconds(i64::from(timestamp.nanosecond()))
}

pub(crate) fn gather_diff(
    recorder: &mut ActionRecorder,
    time_entry: Option<&TimeEntry>,
    worklog: Option<&Worklog>,
    session: &DiffGather,
) {
    let Some(entry) = time_entry else {
        if worklog.is_some() {
            recorder.record_message("Remove worklog, no matching time entry", Level::Danger);
            recorder.delete_worklog();
        }
        return;
    };

    let project_key = entry.issue_key.project_key();
    let Some(policy) = session.policy(&project_key) else {
        tracing::warn!("{}: project '{project_key}' is not set up", entry.issue_key);
        recorder.record_message(
            format!("Project '{project_key}' is not set up"),
            Level::Warning,
        );
        return;
    };
    tracing::debug!("{}: evaluating against policy '{}'", entry.issue_key, policy.key);

    if entry.billable != policy.expected_billable {
        recorder.record_message(
            format!(
                "Update time entry billability to {}",
                policy.expected_billable
            ),
            Level::Info,
        );
        recorder.update_time_entry(TimeEntryField::Billable(policy.expected_billable));
    }

    if let Some(project) = session.resolved_project(&project_key) {
        if entry.project_pid != Some(project.id) {
            recorder.record_message(
                format!("Update time entry project to '{}'", project.name),
                Level::Warning,
            );
            recorder.update_time_entry(TimeEntryField::Pid(project.id));
        }
    }

    let start = entry.start.map(floor_minute);
    let stop = entry.stop.map(floor_minute);
    if let Some(aligned) = start.filter(|aligned| entry.start != Some(*aligned)) {
        recorder.record_message("Align time entry start", Level::Info);
        recorder.update_time_entry(TimeEntryField::Start(TIME_TRACKER.encode(aligned)));
    }
    if let Some(aligned) = stop.filter(|aligned| entry.stop != Some(*aligned)) {
        recorder.record_message("Align time entry stop", Level::Info);
        recorder.update_time_entry(TimeEntryField::Stop(TIME_TRACKER.encode(aligned)));
    }

    let (Some(start), Some(stop), false) = (start, stop, policy.skip_issue_sync) else {
        match worklog {
            None => recorder.record_message("Skip worklog sync", Level::Info),
            Some(_) => {
                recorder.record_message("Delete worklog", Level::Danger);
                recorder.delete_worklog();
            }
        }
        return;
    };

    let expected = WorklogFields {
        started: ISSUE_TRACKER.encode(start),
        time_spent_seconds: duration_seconds(start, stop),
        comment: entry.comment.clone(),
    };

    let Some(worklog) = worklog else {
        recorder.record_message("Create worklog", Level::Danger);
        recorder.create_worklog(expected);
        return;
    };

    if worklog.issue_key != entry.issue_key {
        recorder.record_message(
            format!(
                "Move worklog from {} to {}",
                worklog.issue_key, entry.issue_key
            ),
            Level::Danger,
        );
        recorder.delete_worklog();
        recorder.create_worklog(expected);
        return;
    }

    let WorklogFields {
        started,
        time_spent_seconds,
        comment,
    } = expected;
    reconcile_field(
        recorder,
        worklog,
        WorklogField::Started(started),
        Level::Danger,
        issue_timestamp,
    );
    reconcile_field(
        recorder,
        worklog,
        WorklogField::TimeSpentSeconds(time_spent_seconds),
        Level::Danger,
        identity,
    );
    reconcile_field(
        recorder,
        worklog,
        WorklogField::Comment(comment),
        Level::Warning,
        identity,
    );
}

/// Queue `field` when the worklog's raw value differs from it under `normalize`.
fn reconcile_field<K, F>(
    recorder: &mut ActionRecorder,
    worklog: &Worklog,
    field: WorklogField,
    level: Level,
    normalize: F,
) where
    K: PartialEq,
    F: Fn(&Value) -> K,
{
    let actual = worklog.raw(field.name());
    let expected = field.to_json();
    if differs(actual, &expected, normalize) {
        tracing::info!(
            "worklog field {} differs, actual: {} expected: {}",
            field.name(),
            actual,
            expected
        );
        recorder.record_message(format!("Sync worklog {}", field.name()), level);
        recorder.update_worklog(field);
    }
}

/// Whole seconds between two instants, rounded.
fn duration_seconds(start: DateTime<Utc>, stop: DateTime<Utc>) -> i64 {
    let elapsed = stop - start;
    let millis = elapsed.num_milliseconds();
    (millis as f64 / 1000.0).round() as i64
}
