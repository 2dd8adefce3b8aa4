//! Decision-engine behaviour, one pairing at a time.

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;
use serde_json::{json, Map, Value};

use worklink_core::{
    settings::Settings,
    types::{
        ExternalProject, ExternalProjectId, IssueKey, Pairing, ProjectKey, ProjectPolicy,
        TimeEntry, TimeEntryId, Worklog, WorklogId, WorkspaceId,
    },
    ISSUE_TRACKER,
};
use worklink_sync::{
    Action, DiffGather, Level, PairingDiff, TimeEntryFields, WorklogChanges, WorklogFields,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

fn policy(key: &str, billable: bool, mapped: Option<&str>, skip: bool) -> ProjectPolicy {
    ProjectPolicy {
        key: ProjectKey::from(key),
        mapped_project_name: mapped.map(str::to_string),
        expected_billable: billable,
        skip_issue_sync: skip,
    }
}

fn session_with(policies: Vec<ProjectPolicy>) -> DiffGather {
    init_logging();
    let projects = vec![ExternalProject {
        name: "Client ABC".to_string(),
        id: ExternalProjectId(5),
    }];
    DiffGather::new(Settings::from_policies(policies).expect("settings"), &projects)
        .expect("session")
}

/// ABC: billable, mapped to project 5. OPS: skip sync. FREE: no mapping.
fn session() -> DiffGather {
    session_with(vec![
        policy("ABC", true, Some("Client ABC"), false),
        policy("OPS", false, None, true),
        policy("FREE", false, None, false),
    ])
}

/// An entry already matching the ABC policy: billable, pid 5, 10:00–10:30.
fn entry(issue: &str) -> TimeEntry {
    TimeEntry {
        id: TimeEntryId(1),
        workspace_id: WorkspaceId(9),
        start: Some(at(10, 0, 0)),
        stop: Some(at(10, 30, 0)),
        comment: "X".to_string(),
        billable: true,
        project_pid: Some(ExternalProjectId(5)),
        issue_key: IssueKey::from(issue),
        raw_fields: Map::new(),
    }
}

/// A worklog matching `entry(issue)` exactly.
fn worklog(issue: &str) -> Worklog {
    let mut raw = Map::new();
    raw.insert("started".into(), json!("2024-01-01T10:00:00.000+0000"));
    raw.insert("timeSpentSeconds".into(), json!(1800));
    raw.insert("comment".into(), json!("X"));
    Worklog {
        id: WorklogId::from("42"),
        issue_key: IssueKey::from(issue),
        raw_fields: raw,
    }
}

fn with_raw(mut worklog: Worklog, field: &str, value: Value) -> Worklog {
    worklog.raw_fields.insert(field.to_string(), value);
    worklog
}

fn diff(time_entry: Option<TimeEntry>, worklog: Option<Worklog>) -> PairingDiff {
    session().gather_diff(&Pairing {
        time_entry,
        worklog,
    })
}

fn levels(diff: &PairingDiff) -> Vec<Level> {
    diff.messages.iter().map(|m| m.level).collect()
}

fn expected_payload() -> WorklogFields {
    WorklogFields {
        started: "2024-01-01T10:00:00.000+0000".to_string(),
        time_spent_seconds: 1800,
        comment: "X".to_string(),
    }
}

// ---------------------------------------------------------------------------
// 1. No time entry
// ---------------------------------------------------------------------------

#[test]
fn orphan_worklog_is_deleted() {
    let result = diff(None, Some(worklog("ABC-1")));
    assert_eq!(
        result.actions,
        vec![Action::WorklogDelete {
            id: WorklogId::from("42"),
            issue_key: IssueKey::from("ABC-1"),
        }]
    );
    assert_eq!(levels(&result), [Level::Danger]);
}

#[test]
fn orphan_worklog_is_deleted_even_for_unconfigured_project() {
    let result = diff(None, Some(worklog("ZZZ-1")));
    assert_eq!(result.actions.len(), 1);
    assert!(matches!(result.actions[0], Action::WorklogDelete { .. }));
}

#[test]
fn empty_pairing_produces_nothing() {
    let result = diff(None, None);
    assert!(result.actions.is_empty());
    assert!(result.messages.is_empty());
}

// ---------------------------------------------------------------------------
// 2. Policy lookup
// ---------------------------------------------------------------------------

#[test]
fn unconfigured_project_is_skipped_with_warning() {
    let mut unknown = entry("ZZZ-1");
    unknown.billable = false;
    unknown.start = Some(at(10, 0, 30));
    let result = diff(Some(unknown), Some(worklog("ZZZ-1")));
    assert!(result.actions.is_empty());
    assert_eq!(levels(&result), [Level::Warning]);
    assert!(result.messages[0].text.contains("ZZZ"));
}

// ---------------------------------------------------------------------------
// 3–5. Time-entry normalization
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_billability_then_create() {
    let mut unbilled = entry("ABC-1");
    unbilled.billable = false;
    let result = diff(Some(unbilled), None);
    assert_eq!(
        result.actions,
        vec![
            Action::TimeEntryUpdate {
                workspace_id: WorkspaceId(9),
                id: TimeEntryId(1),
                fields: TimeEntryFields {
                    billable: Some(true),
                    ..TimeEntryFields::default()
                },
                issue_key: IssueKey::from("ABC-1"),
            },
            Action::WorklogCreate {
                fields: expected_payload(),
                issue_key: IssueKey::from("ABC-1"),
            },
        ]
    );
    assert_eq!(levels(&result), [Level::Info, Level::Danger]);
}

#[test]
fn wrong_project_is_corrected_with_warning() {
    let mut misfiled = entry("ABC-1");
    misfiled.project_pid = Some(ExternalProjectId(99));
    let result = diff(Some(misfiled), Some(worklog("ABC-1")));
    let Action::TimeEntryUpdate { fields, .. } = &result.actions[0] else {
        panic!("expected time entry update, got {:?}", result.actions);
    };
    assert_eq!(fields.pid, Some(ExternalProjectId(5)));
    assert_eq!(result.actions.len(), 1);
    assert_eq!(levels(&result), [Level::Warning]);
}

#[test]
fn missing_project_is_set_when_policy_maps_one() {
    let mut unfiled = entry("ABC-1");
    unfiled.project_pid = None;
    let result = diff(Some(unfiled), Some(worklog("ABC-1")));
    assert!(matches!(
        &result.actions[0],
        Action::TimeEntryUpdate { fields, .. } if fields.pid == Some(ExternalProjectId(5))
    ));
}

#[test]
fn unmapped_policy_never_touches_project() {
    let mut free = entry("FREE-1");
    free.billable = false;
    free.project_pid = Some(ExternalProjectId(123));
    let result = diff(Some(free), Some(worklog("FREE-1")));
    assert!(result.actions.is_empty(), "got {:?}", result.actions);
}

#[test]
fn scenario_c_alignment_and_create() {
    let mut ragged = entry("ABC-1");
    ragged.start = Some(at(10, 0, 30));
    ragged.stop = Some(at(10, 30, 45));
    let result = diff(Some(ragged), None);

    assert_eq!(
        result.actions,
        vec![
            Action::TimeEntryUpdate {
                workspace_id: WorkspaceId(9),
                id: TimeEntryId(1),
                fields: TimeEntryFields {
                    start: Some("2024-01-01T10:00:00+00:00".to_string()),
                    stop: Some("2024-01-01T10:30:00+00:00".to_string()),
                    ..TimeEntryFields::default()
                },
                issue_key: IssueKey::from("ABC-1"),
            },
            Action::WorklogCreate {
                fields: expected_payload(),
                issue_key: IssueKey::from("ABC-1"),
            },
        ]
    );
    assert_eq!(levels(&result), [Level::Info, Level::Info, Level::Danger]);
}

// ---------------------------------------------------------------------------
// 6. Skip-sync gate
// ---------------------------------------------------------------------------

#[rstest]
#[case::missing_stop(entry_without_stop())]
#[case::skip_policy(ops_entry())]
fn skip_without_worklog_is_informational(#[case] time_entry: TimeEntry) {
    let result = diff(Some(time_entry), None);
    assert!(result
        .actions
        .iter()
        .all(|a| matches!(a, Action::TimeEntryUpdate { .. })));
    assert_eq!(levels(&result).last(), Some(&Level::Info));
}

#[rstest]
#[case::missing_stop(entry_without_stop())]
#[case::skip_policy(ops_entry())]
fn skip_with_worklog_deletes_it(#[case] time_entry: TimeEntry) {
    let issue = time_entry.issue_key.0.clone();
    let result = diff(Some(time_entry), Some(worklog(&issue)));
    assert!(matches!(result.actions.last(), Some(Action::WorklogDelete { .. })));
    assert_eq!(levels(&result).last(), Some(&Level::Danger));
}

fn entry_without_stop() -> TimeEntry {
    TimeEntry {
        stop: None,
        ..entry("ABC-1")
    }
}

fn ops_entry() -> TimeEntry {
    TimeEntry {
        billable: false,
        ..entry("OPS-3")
    }
}

#[test]
fn missing_start_still_aligns_stop() {
    let mut half = entry("ABC-1");
    half.start = None;
    half.stop = Some(at(10, 30, 45));
    let result = diff(Some(half), None);
    assert_eq!(
        result.actions,
        vec![Action::TimeEntryUpdate {
            workspace_id: WorkspaceId(9),
            id: TimeEntryId(1),
            fields: TimeEntryFields {
                stop: Some("2024-01-01T10:30:00+00:00".to_string()),
                ..TimeEntryFields::default()
            },
            issue_key: IssueKey::from("ABC-1"),
        }]
    );
}

// ---------------------------------------------------------------------------
// 8–9. Create and move
// ---------------------------------------------------------------------------

#[rstest]
#[case("ABC-1", "ABC-2")]
#[case("ABC-7", "OPS-1")]
#[case("ABC-1", "abc-1")]
fn move_is_delete_then_create(#[case] target: &str, #[case] current: &str) {
    let result = diff(Some(entry(target)), Some(worklog(current)));
    assert_eq!(
        result.actions,
        vec![
            Action::WorklogDelete {
                id: WorklogId::from("42"),
                issue_key: IssueKey::from(current),
            },
            Action::WorklogCreate {
                fields: expected_payload(),
                issue_key: IssueKey::from(target),
            },
        ]
    );
    assert_eq!(levels(&result), [Level::Danger]);
}

// ---------------------------------------------------------------------------
// 10. Field reconciliation
// ---------------------------------------------------------------------------

#[test]
fn matching_pair_is_idempotent() {
    let result = diff(Some(entry("ABC-1")), Some(worklog("ABC-1")));
    assert!(result.actions.is_empty());
    assert!(result.messages.is_empty());
}

#[test]
fn equivalent_started_encoding_is_not_a_diff() {
    let shifted = with_raw(
        worklog("ABC-1"),
        "started",
        json!("2024-01-01T12:00:00.000+0200"),
    );
    let result = diff(Some(entry("ABC-1")), Some(shifted));
    assert!(result.actions.is_empty(), "got {:?}", result.actions);
}

#[rstest]
#[case("started", json!("2024-01-01T09:00:00.000+0000"), Level::Danger)]
#[case("started", Value::Null, Level::Danger)]
#[case("timeSpentSeconds", json!(1815), Level::Danger)]
#[case("comment", json!("Y"), Level::Warning)]
#[case("comment", Value::Null, Level::Warning)]
fn single_field_drift(#[case] field: &str, #[case] raw: Value, #[case] level: Level) {
    let drifted = with_raw(worklog("ABC-1"), field, raw);
    let result = diff(Some(entry("ABC-1")), Some(drifted));
    assert_eq!(levels(&result), [level]);
    let [Action::WorklogUpdate { id, fields, issue_key }] = result.actions.as_slice() else {
        panic!("expected one worklog update, got {:?}", result.actions);
    };
    assert_eq!(id, &WorklogId::from("42"));
    assert_eq!(issue_key, &IssueKey::from("ABC-1"));
    let as_json = serde_json::to_value(fields).unwrap();
    let keys: Vec<_> = as_json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, [field.to_string()]);
}

#[test]
fn two_field_drift_shares_one_update() {
    let drifted = with_raw(
        with_raw(worklog("ABC-1"), "timeSpentSeconds", json!(60)),
        "comment",
        json!("old"),
    );
    let result = diff(Some(entry("ABC-1")), Some(drifted));
    assert_eq!(
        result.actions,
        vec![Action::WorklogUpdate {
            id: WorklogId::from("42"),
            fields: WorklogChanges {
                started: None,
                time_spent_seconds: Some(1800),
                comment: Some("X".to_string()),
            },
            issue_key: IssueKey::from("ABC-1"),
        }]
    );
    assert_eq!(levels(&result), [Level::Danger, Level::Warning]);
}

#[test]
fn all_fields_and_time_entry_in_one_pass() {
    let mut ragged = entry("ABC-1");
    ragged.billable = false;
    ragged.start = Some(at(10, 0, 59));
    let drifted = worklog("ABC-1");
    let drifted = with_raw(drifted, "started", json!("2024-01-01T08:00:00.000+0000"));
    let drifted = with_raw(drifted, "timeSpentSeconds", json!(1));
    let drifted = with_raw(drifted, "comment", json!(""));
    let result = diff(Some(ragged), Some(drifted));

    assert_eq!(result.actions.len(), 2);
    assert!(matches!(result.actions[0], Action::TimeEntryUpdate { .. }));
    let Action::WorklogUpdate { fields, .. } = &result.actions[1] else {
        panic!("expected worklog update, got {:?}", result.actions);
    };
    assert_eq!(fields.complete(), Some(expected_payload()));
    assert_eq!(
        levels(&result),
        [Level::Info, Level::Info, Level::Danger, Level::Danger, Level::Warning]
    );
}

#[test]
fn expected_started_uses_issue_tracker_codec() {
    let result = diff(Some(entry("ABC-1")), None);
    let Action::WorklogCreate { fields, .. } = &result.actions[0] else {
        panic!("expected create, got {:?}", result.actions);
    };
    assert_eq!(ISSUE_TRACKER.decode(&fields.started).unwrap(), at(10, 0, 0));
}

// ---------------------------------------------------------------------------
// Fatal construction
// ---------------------------------------------------------------------------

#[test]
fn session_rejects_unknown_mapped_project() {
    let settings =
        Settings::from_policies([policy("ABC", true, Some("Nope"), false)]).expect("settings");
    assert!(DiffGather::new(settings, &[]).is_err());
}
