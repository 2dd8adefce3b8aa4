//! Shared diff pipeline entrypoint used by the CLI commands.

use chrono::NaiveDate;
use serde::Serialize;

use worklink_core::{
    types::{IssueKey, Pairing},
    ISSUE_TRACKER,
};

use crate::session::{DiffGather, PairingDiff};

/// Which pairings of a snapshot a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffScope {
    /// Every pairing.
    All,
    /// Pairings whose time entry or worklog targets this issue.
    Issue(IssueKey),
    /// Pairings dated on this calendar day (UTC).
    Day(NaiveDate),
}

impl DiffScope {
    fn includes(&self, pairing: &Pairing) -> bool {
        match self {
            DiffScope::All => true,
            DiffScope::Issue(key) => {
                pairing.time_entry.as_ref().is_some_and(|e| &e.issue_key == key)
                    || pairing.worklog.as_ref().is_some_and(|w| &w.issue_key == key)
            }
            DiffScope::Day(day) => pairing_day(pairing) == Some(*day),
        }
    }
}

/// One evaluated pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingReport {
    pub issue_key: Option<IssueKey>,
    pub day: Option<NaiveDate>,
    #[serde(flatten)]
    pub diff: PairingDiff,
}

/// Run the decision engine over every pairing in scope, preserving input order.
pub fn run(session: &DiffGather, pairings: &[Pairing], scope: &DiffScope) -> Vec<PairingReport> {
    let reports: Vec<PairingReport> = pairings
        .iter()
        .filter(|pairing| scope.includes(pairing))
        .map(|pairing| PairingReport {
            issue_key: pairing.issue_key().cloned(),
            day: pairing_day(pairing),
            diff: session.gather_diff(pairing),
        })
        .collect();
    tracing::debug!(
        "evaluated {} of {} pairings ({} actions)",
        reports.len(),
        pairings.len(),
        reports.iter().map(|r| r.diff.actions.len()).sum::<usize>()
    );
    reports
}

/// Calendar day of a pairing: the time entry's start, else the worklog's `started`.
pub fn pairing_day(pairing: &Pairing) -> Option<NaiveDate> {
    if let Some(entry) = pairing.time_entry.as_ref() {
        return entry.start.map(|start| start.date_naive());
    }
    let worklog = pairing.worklog.as_ref()?;
    let started = worklog.raw("started").as_str()?;
    ISSUE_TRACKER
        .decode(started)
        .ok()
        .map(|started| started.date_naive())
}
