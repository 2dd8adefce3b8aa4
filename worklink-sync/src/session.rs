//! Diff session: the read-only project lookup shared by every pairing of a run.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use worklink_core::{
    settings::Settings,
    types::{ExternalProject, Pairing, ProjectKey, ProjectPolicy},
};

use crate::action::{Action, Message};
use crate::engine;
use crate::recorder::ActionRecorder;
use crate::SyncError;

/// Actions and messages for one pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingDiff {
    pub actions: Vec<Action>,
    pub messages: Vec<Message>,
}

/// Settings plus each policy's resolved time-tracking project.
///
/// Built once per run and only read afterwards, so one session can serve
/// pairings from several threads.
#[derive(Debug, Clone)]
pub struct DiffGather {
    settings: Settings,
    projects_by_key: BTreeMap<ProjectKey, Option<ExternalProject>>,
}

impl DiffGather {
    /// Resolve every policy's mapped project by name.
    ///
    /// Fails with [`SyncError::UnknownExternalProject`] when a configured name
    /// is not among `projects`; no partial session is returned.
    pub fn new(settings: Settings, projects: &[ExternalProject]) -> Result<Self, SyncError> {
        let projects_by_name: HashMap<&str, &ExternalProject> = projects
            .iter()
            .map(|project| (project.name.as_str(), project))
            .collect();

        let mut projects_by_key = BTreeMap::new();
        for policy in settings.policies() {
            let resolved = match policy.mapped_project_name.as_deref() {
                None => None,
                Some(name) => {
                    let project = projects_by_name.get(name).ok_or_else(|| {
                        SyncError::UnknownExternalProject {
                            key: policy.key.clone(),
                            name: name.to_string(),
                        }
                    })?;
                    Some((*project).clone())
                }
            };
            projects_by_key.insert(policy.key.clone(), resolved);
        }

        tracing::debug!(
            "diff session ready: {} policies, {} known projects",
            settings.len(),
            projects.len()
        );
        Ok(Self {
            settings,
            projects_by_key,
        })
    }

    /// Run the decision engine on one pairing.
    pub fn gather_diff(&self, pairing: &Pairing) -> PairingDiff {
        let mut recorder = ActionRecorder::new(pairing);
        engine::gather_diff(
            &mut recorder,
            pairing.time_entry.as_ref(),
            pairing.worklog.as_ref(),
            self,
        );
        let (actions, messages) = recorder.serialize();
        PairingDiff { actions, messages }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn policy(&self, key: &ProjectKey) -> Option<&ProjectPolicy> {
        self.settings.policy(key)
    }

    /// The time-tracking project a policy maps to, if it maps to one.
    pub fn resolved_project(&self, key: &ProjectKey) -> Option<&ExternalProject> {
        self.projects_by_key.get(key).and_then(Option::as_ref)
    }
}
