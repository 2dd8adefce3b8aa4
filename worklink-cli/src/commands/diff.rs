//! `worklink diff` — show what a sync run would change, pairing by pairing.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;

use worklink_core::types::IssueKey;
use worklink_sync::{pipeline, Action, DiffScope, Level, Message, PairingReport};

use super::InputArgs;

/// Arguments for `worklink diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only pairings touching this issue (e.g. "ABC-123").
    #[arg(long, conflicts_with = "day")]
    pub issue: Option<String>,

    /// Only pairings dated on this day (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub day: Option<NaiveDate>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let (session, snapshot) = self.input.load()?;
        let scope = match (self.issue, self.day) {
            (Some(issue), _) => DiffScope::Issue(IssueKey::from(issue)),
            (None, Some(day)) => DiffScope::Day(day),
            (None, None) => DiffScope::All,
        };

        let reports = pipeline::run(&session, &snapshot.pairings, &scope);
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&reports).context("failed to serialize diff JSON")?
            );
            return Ok(());
        }

        print_reports(&reports);
        Ok(())
    }
}

fn print_reports(reports: &[PairingReport]) {
    let changed: Vec<&PairingReport> = reports
        .iter()
        .filter(|report| !report.diff.messages.is_empty())
        .collect();
    if changed.is_empty() {
        println!("No differences across {} pairings.", reports.len());
        return;
    }

    for report in &changed {
        let issue = report
            .issue_key
            .as_ref()
            .map(|key| key.to_string())
            .unwrap_or_else(|| "-".to_string());
        let day = report
            .day
            .map(|day| day.to_string())
            .unwrap_or_else(|| "undated".to_string());
        println!("{} {}", issue.bold(), format!("({day})").bright_black());
        for message in &report.diff.messages {
            println!("  {}", render_message(message));
        }
        for action in &report.diff.actions {
            println!("  {} {}", "→".bright_black(), render_action(action));
        }
    }

    let actions: usize = changed.iter().map(|report| report.diff.actions.len()).sum();
    println!(
        "{} of {} pairings differ ({} actions).",
        changed.len(),
        reports.len(),
        actions
    );
}

fn render_message(message: &Message) -> String {
    let tag = format!("[{}]", message.level);
    let tag = match message.level {
        Level::Info => tag.cyan(),
        Level::Warning => tag.yellow(),
        Level::Danger => tag.red().bold(),
    };
    format!("{tag} {}", message.text)
}

fn render_action(action: &Action) -> String {
    let detail = match action {
        Action::TimeEntryUpdate { id, fields, .. } => {
            format!("#{id} {}", compact_json(fields))
        }
        Action::WorklogDelete { id, .. } => format!("#{id}"),
        Action::WorklogCreate { fields, .. } => compact_json(fields),
        Action::WorklogUpdate { id, fields, .. } => format!("#{id} {}", compact_json(fields)),
    };
    format!("{} {} {}", action.label(), action.issue_key(), detail)
}

fn compact_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
