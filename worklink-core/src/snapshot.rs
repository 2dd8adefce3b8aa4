//! Offline snapshot of already-fetched external state.
//!
//! A snapshot is one JSON document holding the time tracker's project list
//! and the matched pairings for a run:
//!
//! ```json
//! {
//!   "projects": [{ "name": "Client ABC", "id": 5 }],
//!   "pairings": [{ "time_entry": { ... }, "worklog": null }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ExternalProject, Pairing};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<ExternalProject>,
    #[serde(default)]
    pub pairings: Vec<Pairing>,
}

impl Snapshot {
    /// Parse and validate a snapshot document.
    ///
    /// `path` is only used for error context.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let snapshot: Snapshot = serde_json::from_str(contents).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject pairings that carry neither side.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.pairings.iter().position(Pairing::is_empty) {
            Some(index) => Err(ConfigError::EmptyPairing { index }),
            None => Ok(()),
        }
    }
}

/// Load a snapshot from `path`.
pub fn load_from(path: &Path) -> Result<Snapshot, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    Snapshot::parse(&contents, path)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("snapshot.json")
    }

    #[test]
    fn parses_projects_and_pairings() {
        let json = r#"{
            "projects": [{ "name": "Client ABC", "id": 5 }],
            "pairings": [{
                "time_entry": {
                    "id": 1,
                    "workspace_id": 9,
                    "start": "2024-01-01T10:00:00Z",
                    "stop": "2024-01-01T10:30:00Z",
                    "comment": "review",
                    "billable": true,
                    "project_pid": 5,
                    "issue_key": "ABC-1"
                },
                "worklog": { "id": "42", "issue_key": "ABC-1", "raw_fields": { "timeSpentSeconds": 1800 } }
            }]
        }"#;
        let snapshot = Snapshot::parse(json, &path()).expect("parse");
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].id.0, 5);
        let pairing = &snapshot.pairings[0];
        assert_eq!(pairing.time_entry.as_ref().unwrap().comment, "review");
        assert_eq!(
            pairing.worklog.as_ref().unwrap().raw("timeSpentSeconds"),
            &serde_json::json!(1800)
        );
    }

    #[test]
    fn empty_pairing_is_rejected_with_index() {
        let json = r#"{ "pairings": [
            { "worklog": { "id": "1", "issue_key": "ABC-1" } },
            { "time_entry": null, "worklog": null }
        ] }"#;
        let err = Snapshot::parse(json, &path()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPairing { index: 1 }));
    }

    #[test]
    fn malformed_json_reports_path() {
        let err = Snapshot::parse("{ not json", &path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("snapshot.json"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let err = load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
