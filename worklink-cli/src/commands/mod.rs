pub mod diff;
pub mod settings;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use worklink_core::{settings as settings_store, snapshot, Settings, Snapshot};
use worklink_sync::DiffGather;

/// Input files shared by `diff` and `status`.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Snapshot JSON with `projects` and `pairings`.
    #[arg(long, short = 's')]
    pub snapshot: PathBuf,

    /// Settings YAML (defaults to ~/.worklink/settings.yaml).
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl InputArgs {
    /// Load both files and build the diff session.
    pub fn load(&self) -> Result<(DiffGather, Snapshot)> {
        let settings = load_settings(self.settings.as_deref())?;
        let snapshot = snapshot::load_from(&self.snapshot)
            .with_context(|| format!("failed to load snapshot '{}'", self.snapshot.display()))?;
        log::debug!(
            "loaded {} policies and {} pairings ({} projects)",
            settings.len(),
            snapshot.pairings.len(),
            snapshot.projects.len()
        );
        let session = DiffGather::new(settings, &snapshot.projects)
            .context("settings do not match the snapshot's projects")?;
        Ok((session, snapshot))
    }
}

/// Load settings from `path`, or from `~/.worklink/settings.yaml`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => settings_store::load_from(path)
            .with_context(|| format!("failed to load settings '{}'", path.display())),
        None => {
            let home = home()?;
            settings_store::load_at(&home)
                .context("failed to load settings — run `worklink settings add` first")
        }
    }
}

pub fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}
