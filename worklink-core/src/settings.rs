//! Project-policy settings.
//!
//! # Storage layout
//!
//! ```text
//! ~/.worklink/
//!   settings.yaml   (mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function touching the default location has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ProjectKey, ProjectPolicy};

// ---------------------------------------------------------------------------
// 1. Settings
// ---------------------------------------------------------------------------

/// On-disk shape of `settings.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    projects: Vec<ProjectPolicy>,
}

/// Validated policy set, keyed by issue-tracker project key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    projects: BTreeMap<ProjectKey, ProjectPolicy>,
}

impl Settings {
    /// Build a policy set, rejecting duplicate project keys.
    pub fn from_policies(
        policies: impl IntoIterator<Item = ProjectPolicy>,
    ) -> Result<Self, ConfigError> {
        let mut projects = BTreeMap::new();
        for policy in policies {
            if projects.contains_key(&policy.key) {
                return Err(ConfigError::DuplicateProject { key: policy.key });
            }
            projects.insert(policy.key.clone(), policy);
        }
        Ok(Self { projects })
    }

    pub fn policy(&self, key: &ProjectKey) -> Option<&ProjectPolicy> {
        self.projects.get(key)
    }

    /// Policies sorted by project key.
    pub fn policies(&self) -> impl Iterator<Item = &ProjectPolicy> {
        self.projects.values()
    }

    /// Insert or replace the policy for `policy.key`.
    pub fn upsert(&mut self, policy: ProjectPolicy) {
        self.projects.insert(policy.key.clone(), policy);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

// ---------------------------------------------------------------------------
// 2. Paths
// ---------------------------------------------------------------------------

/// `<home>/.worklink/settings.yaml` — pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(".worklink").join("settings.yaml")
}

/// `settings_path_at` convenience wrapper.
pub fn settings_path() -> Result<PathBuf, ConfigError> {
    Ok(settings_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load settings from an explicit file path.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let file: SettingsFile = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Settings::from_policies(file.projects)
}

/// Load `<home>/.worklink/settings.yaml`.
pub fn load_at(home: &Path) -> Result<Settings, ConfigError> {
    load_from(&settings_path_at(home))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, ConfigError> {
    load_at(&home()?)
}

/// Load `<home>/.worklink/settings.yaml`, or an empty set if the file does not exist yet.
pub fn load_or_default_at(home: &Path) -> Result<Settings, ConfigError> {
    match load_at(home) {
        Err(ConfigError::NotFound { .. }) => Ok(Settings::default()),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// 4. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save settings to `<home>/.worklink/settings.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, settings: &Settings) -> Result<PathBuf, ConfigError> {
    let path = settings_path_at(home);
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            set_dir_permissions(dir)?;
        }
    }
    let tmp_path = path.with_file_name("settings.yaml.tmp");

    let file = SettingsFile {
        projects: settings.policies().cloned().collect(),
    };
    let yaml = serde_yaml::to_string(&file)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// Insert or replace one policy in `<home>/.worklink/settings.yaml`, creating the file if needed.
pub fn upsert_policy_at(home: &Path, policy: ProjectPolicy) -> Result<Settings, ConfigError> {
    let mut settings = load_or_default_at(home)?;
    settings.upsert(policy);
    save_at(home, &settings)?;
    Ok(settings)
}

/// `upsert_policy_at` convenience wrapper.
pub fn upsert_policy(policy: ProjectPolicy) -> Result<Settings, ConfigError> {
    upsert_policy_at(&home()?, policy)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
