//! RunPlanHandler - submits a plan job for the session's stack.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::cli::{JobCreate, OciCli};
use crate::application::records::Records;
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::deploy::{DeployError, JobType, RmJobRecord, STATUS_ACCEPTED};
use crate::domain::foundation::SessionId;

use super::{append_job, resolve_stack_id};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunPlanCommand {
    pub session_id: SessionId,
    #[serde(default)]
    pub stack_id: Option<String>,
}

/// A job accepted by the provisioning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSubmitted {
    pub job_id: String,
    pub status: String,
}

pub struct RunPlanHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
    oci: OciCli,
}

impl RunPlanHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog, oci: OciCli) -> Self {
        Self {
            records,
            locks,
            log,
            oci,
        }
    }

    pub async fn handle(&self, cmd: RunPlanCommand) -> Result<JobSubmitted, DeployError> {
        let id = cmd.session_id;
        let state = self
            .records
            .load_deploy_state(&id)
            .await?
            .ok_or(DeployError::NoStack(id))?;
        let stack_id = resolve_stack_id(&state, cmd.stack_id)?;

        let output = self
            .oci
            .create_job(&JobCreate {
                stack_id: &stack_id,
                job_type: JobType::Plan,
                strategy: None,
                plan_job_id: None,
            })
            .await?;
        let job_id = output
            .data_str("id")
            .ok_or_else(|| DeployError::missing_job_id("plan"))?
            .to_string();
        let status = output
            .data_str("lifecycle-state")
            .unwrap_or(STATUS_ACCEPTED)
            .to_string();

        append_job(
            &self.records,
            &self.locks,
            id,
            RmJobRecord::new(job_id.clone(), JobType::Plan, status.clone()),
        )
        .await?;

        self.log
            .info(
                &id,
                "run_plan",
                &format!("Plan job created: {}", job_id),
                Some(json!({ "stack_id": stack_id, "status": status })),
            )
            .await;

        Ok(JobSubmitted { job_id, status })
    }
}
