//! Error types for worklink-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ProjectKey;

/// All errors that can arise from loading or saving settings and snapshots.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON parse error while reading a snapshot file.
    #[error("failed to parse snapshot at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.worklink/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The settings or snapshot file did not exist at the expected path.
    #[error("file not found at {path}")]
    NotFound { path: PathBuf },

    /// Two policies in one settings file share a project key.
    #[error("project '{key}' is configured more than once")]
    DuplicateProject { key: ProjectKey },

    /// A snapshot pairing with neither a time entry nor a worklog.
    #[error("pairing #{index} has neither a time entry nor a worklog")]
    EmptyPairing { index: usize },
}

/// A timestamp string that does not match the codec it was decoded with.
#[derive(Debug, Error)]
#[error("invalid timestamp {input:?}: {source}")]
pub struct TimestampError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}
