//! `worklink status` — per-day difference summary.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use worklink_sync::{group_by_day, pipeline, DayReport, DiffScope, Level};

use super::InputArgs;

/// Arguments for `worklink status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let (session, snapshot) = self.input.load()?;
        let reports = pipeline::run(&session, &snapshot.pairings, &DiffScope::All);
        let days = group_by_day(reports);

        if self.json {
            print_json(&days)?;
            return Ok(());
        }

        print_table(&days, session.settings().len());
        Ok(())
    }
}

#[derive(Serialize)]
struct DayStatusJson {
    date: Option<String>,
    pairings: usize,
    differences: usize,
    danger: usize,
    warning: usize,
    info: usize,
}

#[derive(Tabled)]
struct DayTableRow {
    #[tabled(rename = "date")]
    date: String,
    #[tabled(rename = "pairings")]
    pairings: usize,
    #[tabled(rename = "differences")]
    differences: String,
    #[tabled(rename = "danger")]
    danger: usize,
    #[tabled(rename = "warning")]
    warning: usize,
    #[tabled(rename = "info")]
    info: usize,
}

fn day_label(day: &DayReport) -> String {
    day.date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "undated".to_string())
}

fn print_json(days: &[DayReport]) -> Result<()> {
    let payload: Vec<DayStatusJson> = days
        .iter()
        .map(|day| DayStatusJson {
            date: day.date.map(|date| date.to_string()),
            pairings: day.rows.len(),
            differences: day.differences(),
            danger: day.count(Level::Danger),
            warning: day.count(Level::Warning),
            info: day.count(Level::Info),
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(days: &[DayReport], policy_count: usize) {
    let pairings: usize = days.iter().map(|day| day.rows.len()).sum();
    let dirty = days.iter().filter(|day| !day.is_clean()).count();
    println!(
        "Worklink v{} | {} policies | {} pairings | {} days with differences",
        env!("CARGO_PKG_VERSION"),
        policy_count,
        pairings,
        dirty,
    );

    if days.is_empty() {
        println!("No pairings in snapshot.");
        return;
    }

    let rows: Vec<DayTableRow> = days
        .iter()
        .map(|day| {
            let differences = if day.is_clean() {
                "in sync".green().to_string()
            } else {
                format!("{} differences", day.differences())
                    .yellow()
                    .to_string()
            };
            DayTableRow {
                date: day_label(day),
                pairings: day.rows.len(),
                differences,
                danger: day.count(Level::Danger),
                warning: day.count(Level::Warning),
                info: day.count(Level::Info),
            }
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if dirty > 0 {
        println!("Run 'worklink diff --day <date>' to inspect a day.");
    }
}
