//! Error types for worklink-sync.

use thiserror::Error;

use worklink_core::{error::ConfigError, types::ProjectKey};

/// All errors that can arise while setting up a diff run.
///
/// Per-pairing conditions (unconfigured project, missing timestamps, issue
/// mismatch) are never errors; they surface as messages on the pairing diff.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A policy maps to a time-tracking project that does not exist.
    #[error(
        "time-tracking project {name:?} (configured for '{key}') not found; \
         check that it exists and look for typos in its name"
    )]
    UnknownExternalProject { key: ProjectKey, name: String },

    /// An error from settings or snapshot loading.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
