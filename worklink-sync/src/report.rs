//! Per-day grouping of pipeline results.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::action::Level;
use crate::pipeline::PairingReport;

/// All pairings dated on one calendar day. Undated pairings share `date: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: Option<NaiveDate>,
    pub rows: Vec<PairingReport>,
}

impl DayReport {
    /// Total actions across the day ("N differences").
    pub fn differences(&self) -> usize {
        self.rows.iter().map(|row| row.diff.actions.len()).sum()
    }

    pub fn count(&self, level: Level) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.diff.messages.iter())
            .filter(|message| message.level == level)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.differences() == 0
    }
}

/// Group reports by day, days ascending (undated first), input order within a day.
pub fn group_by_day(rows: Vec<PairingReport>) -> Vec<DayReport> {
    let mut days = BTreeMap::<Option<NaiveDate>, Vec<PairingReport>>::new();
    for row in rows {
        days.entry(row.day).or_default().push(row);
    }
    days.into_iter()
        .map(|(date, rows)| DayReport { date, rows })
        .collect()
}

#[cfg(test)]
mod tests {
    use worklink_core::types::{IssueKey, WorklogId};

    use super::*;
    use crate::action::{Action, Message};
    use crate::session::PairingDiff;

    fn row(day: Option<u32>, actions: usize, level: Level) -> PairingReport {
        PairingReport {
            issue_key: Some(IssueKey::from("ABC-1")),
            day: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d)),
            diff: PairingDiff {
                actions: (0..actions)
                    .map(|_| Action::WorklogDelete {
                        id: WorklogId::from("1"),
                        issue_key: IssueKey::from("ABC-1"),
                    })
                    .collect(),
                messages: vec![Message {
                    text: "m".to_string(),
                    level,
                }],
            },
        }
    }

    #[test]
    fn groups_sorted_with_undated_first() {
        let days = group_by_day(vec![
            row(Some(2), 1, Level::Danger),
            row(None, 0, Level::Warning),
            row(Some(1), 0, Level::Info),
            row(Some(2), 2, Level::Info),
        ]);
        let dates: Vec<_> = days.iter().map(|d| d.date.map(|x| x.to_string())).collect();
        assert_eq!(
            dates,
            [None, Some("2024-01-01".to_string()), Some("2024-01-02".to_string())]
        );
        assert_eq!(days[2].rows.len(), 2);
        assert_eq!(days[2].differences(), 3);
        assert_eq!(days[2].count(Level::Danger), 1);
        assert_eq!(days[2].count(Level::Info), 1);
        assert!(days[1].is_clean());
    }

    #[test]
    fn empty_input_has_no_days() {
        assert!(group_by_day(Vec::new()).is_empty());
    }
}
