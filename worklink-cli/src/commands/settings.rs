//! `worklink settings list` and `worklink settings add <KEY>`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use worklink_core::{
    settings as settings_store, snapshot,
    types::{ProjectKey, ProjectPolicy},
};
use worklink_sync::DiffGather;

use super::{home, load_settings};

/// Manage per-project sync policies.
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// List configured policies, optionally checking them against a snapshot.
    List(ListArgs),

    /// Add or replace the policy for one issue-tracker project.
    Add(AddArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Settings YAML (defaults to ~/.worklink/settings.yaml).
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Snapshot whose project list every mapped project must resolve against.
    #[arg(long, short = 's')]
    pub snapshot: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Issue-tracker project key (e.g. "ABC").
    pub key: String,

    /// Time-tracking project entries of this key must belong to.
    #[arg(long = "time-tracker-project", value_name = "NAME")]
    pub time_tracker_project: Option<String>,

    /// Entries of this key should be billable.
    #[arg(long)]
    pub billable: bool,

    /// Never create, update, or delete worklogs for this key.
    #[arg(long)]
    pub skip_issue_sync: bool,
}

pub fn run(cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::List(args) => list(args),
        SettingsCommand::Add(args) => add(args),
    }
}

fn list(args: ListArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_deref())?;

    if settings.is_empty() {
        println!("No project policies configured.");
        println!("Run: worklink settings add <KEY> --billable");
    }
    for policy in settings.policies() {
        let project = policy
            .mapped_project_name
            .as_deref()
            .map(|name| format!("'{name}'"))
            .unwrap_or_else(|| "any project".to_string());
        let mut flags = vec![if policy.expected_billable {
            "billable"
        } else {
            "non-billable"
        }];
        if policy.skip_issue_sync {
            flags.push("skip issue sync");
        }
        println!("{}  {} [{}]", policy.key.to_string().bold(), project, flags.join(", "));
    }

    let Some(path) = args.snapshot else {
        return Ok(());
    };
    let snapshot = snapshot::load_from(&path)
        .with_context(|| format!("failed to load snapshot '{}'", path.display()))?;
    match DiffGather::new(settings, &snapshot.projects) {
        Ok(_) => {
            println!(
                "{} all mapped projects resolve against '{}'",
                "✓".green(),
                path.display()
            );
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}

fn add(args: AddArgs) -> Result<()> {
    let key = args.key.trim();
    if key.is_empty() {
        bail!("project key must not be empty");
    }
    let policy = ProjectPolicy {
        key: ProjectKey::from(key),
        mapped_project_name: args.time_tracker_project,
        expected_billable: args.billable,
        skip_issue_sync: args.skip_issue_sync,
    };

    let home = home()?;
    let settings = settings_store::upsert_policy_at(&home, policy)
        .with_context(|| format!("failed to save policy for '{key}'"))?;
    println!(
        "✓ Saved policy for '{}' ({} configured) in {}",
        key,
        settings.len(),
        settings_store::settings_path_at(&home).display()
    );
    Ok(())
}
