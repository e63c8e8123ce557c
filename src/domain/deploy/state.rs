//! DeployState - persisted provisioning workflow for one session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionId, Timestamp};

/// Status recorded for a job whose create response carried none.
pub const STATUS_ACCEPTED: &str = "ACCEPTED";

/// Status reported for a job whose status response carried none.
pub const STATUS_UNKNOWN: &str = "UNKNOWN";

/// Kind of resource-manager job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Plan,
    Apply,
}

impl JobType {
    /// Operation name sent to the provisioning CLI.
    pub fn operation(&self) -> &'static str {
        match self {
            JobType::Plan => "PLAN",
            JobType::Apply => "APPLY",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::Plan => write!(f, "plan"),
            JobType::Apply => write!(f, "apply"),
        }
    }
}

/// Cached snapshot of one externally tracked job.
///
/// `status` is only as fresh as the last poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmJobRecord {
    pub job_id: String,
    pub job_type: JobType,
    pub status: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl RmJobRecord {
    pub fn new(job_id: impl Into<String>, job_type: JobType, status: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            job_type,
            status: status.into(),
            created_at: Timestamp::now(),
            updated_at: None,
        }
    }
}

/// Stored in `sessions/{id}/deploy-state.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployState {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub jobs: Vec<RmJobRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Stack details captured on a successful stack create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackInfo {
    pub stack_id: String,
    pub display_name: String,
    pub compartment_id: String,
    pub terraform_version: Option<String>,
}

impl DeployState {
    pub fn new(session_id: SessionId, stack: StackInfo) -> Self {
        let now = Timestamp::now();
        let mut state = Self {
            session_id,
            stack_id: None,
            stack_display_name: None,
            compartment_id: None,
            terraform_version: None,
            jobs: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.set_stack(stack);
        state
    }

    /// Points the state at a (new) stack. Job history is kept.
    pub fn set_stack(&mut self, stack: StackInfo) {
        self.stack_id = Some(stack.stack_id);
        self.stack_display_name = Some(stack.display_name);
        self.compartment_id = Some(stack.compartment_id);
        self.terraform_version = stack.terraform_version;
        self.touch();
    }

    pub fn push_job(&mut self, job: RmJobRecord) {
        self.jobs.push(job);
        self.touch();
    }

    /// The most recently created job of the given type.
    pub fn latest_job(&self, job_type: JobType) -> Option<&RmJobRecord> {
        self.jobs.iter().rev().find(|job| job.job_type == job_type)
    }

    pub fn find_job(&self, job_id: &str) -> Option<&RmJobRecord> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    /// Refreshes the cached status of a tracked job.
    ///
    /// Returns `false` when the job is not in the local history.
    pub fn update_job_status(&mut self, job_id: &str, status: impl Into<String>) -> bool {
        let Some(job) = self.jobs.iter_mut().find(|job| job.job_id == job_id) else {
            return false;
        };
        let now = Timestamp::now();
        job.status = status.into();
        job.updated_at = Some(now);
        self.updated_at = now;
        true
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(id: &str) -> StackInfo {
        StackInfo {
            stack_id: id.to_string(),
            display_name: "galley-test".to_string(),
            compartment_id: "ocid1.compartment.oc1..aaa".to_string(),
            terraform_version: None,
        }
    }

    #[test]
    fn latest_job_scans_from_the_end() {
        let mut state = DeployState::new(SessionId::new(), stack("S1"));
        state.push_job(RmJobRecord::new("P1", JobType::Plan, STATUS_ACCEPTED));
        state.push_job(RmJobRecord::new("P2", JobType::Plan, STATUS_ACCEPTED));
        state.push_job(RmJobRecord::new("A1", JobType::Apply, STATUS_ACCEPTED));

        assert_eq!(state.latest_job(JobType::Plan).unwrap().job_id, "P2");
        assert_eq!(state.latest_job(JobType::Apply).unwrap().job_id, "A1");
    }

    #[test]
    fn latest_job_is_none_without_matching_type() {
        let mut state = DeployState::new(SessionId::new(), stack("S1"));
        state.push_job(RmJobRecord::new("A1", JobType::Apply, STATUS_ACCEPTED));
        assert!(state.latest_job(JobType::Plan).is_none());
    }

    #[test]
    fn update_job_status_only_touches_tracked_jobs() {
        let mut state = DeployState::new(SessionId::new(), stack("S1"));
        state.push_job(RmJobRecord::new("P1", JobType::Plan, STATUS_ACCEPTED));

        assert!(state.update_job_status("P1", "SUCCEEDED"));
        assert!(!state.update_job_status("P9", "FAILED"));

        assert_eq!(state.jobs.len(), 1);
        let job = state.find_job("P1").unwrap();
        assert_eq!(job.status, "SUCCEEDED");
        assert!(job.updated_at.is_some());
    }

    #[test]
    fn set_stack_keeps_job_history() {
        let mut state = DeployState::new(SessionId::new(), stack("S1"));
        state.push_job(RmJobRecord::new("P1", JobType::Plan, STATUS_ACCEPTED));
        state.set_stack(stack("S2"));

        assert_eq!(state.stack_id.as_deref(), Some("S2"));
        assert_eq!(state.jobs.len(), 1);
    }

    #[test]
    fn serializes_job_type_lowercase() {
        let mut state = DeployState::new(SessionId::new(), stack("S1"));
        state.push_job(RmJobRecord::new("P1", JobType::Plan, STATUS_ACCEPTED));
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["jobs"][0]["job_type"], "plan");
        assert_eq!(value["stack_id"], "S1");
        assert!(value.get("terraform_version").is_none());
    }
}
