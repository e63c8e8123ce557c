//! RunApplyHandler - submits an apply job, optionally bound to a plan job.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::cli::{JobCreate, OciCli};
use crate::application::records::Records;
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::deploy::{
    DeployError, DeployState, ExecutionPlanStrategy, JobType, RmJobRecord, STATUS_ACCEPTED,
};
use crate::domain::foundation::SessionId;

use super::{append_job, resolve_stack_id};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunApplyCommand {
    pub session_id: SessionId,
    #[serde(default)]
    pub execution_plan_strategy: ExecutionPlanStrategy,
    #[serde(default)]
    pub plan_job_id: Option<String>,
    #[serde(default)]
    pub stack_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunApplyResult {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_job_id: Option<String>,
}

pub struct RunApplyHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
    oci: OciCli,
}

impl RunApplyHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog, oci: OciCli) -> Self {
        Self {
            records,
            locks,
            log,
            oci,
        }
    }

    /// # Errors
    ///
    /// - `DeployWorkflowError` without a stack, or when `FROM_PLAN_JOB_ID`
    ///   is requested and no plan job can be found
    /// - `ToolNotFound` / `ToolExecutionError` from the CLI
    pub async fn handle(&self, cmd: RunApplyCommand) -> Result<RunApplyResult, DeployError> {
        let id = cmd.session_id;
        let state = self
            .records
            .load_deploy_state(&id)
            .await?
            .ok_or(DeployError::NoStack(id))?;
        let stack_id = resolve_stack_id(&state, cmd.stack_id)?;
        let strategy = cmd.execution_plan_strategy;
        let plan_job_id = if strategy.needs_plan_job() {
            Some(resolve_plan_job(&state, cmd.plan_job_id)?)
        } else {
            None
        };

        let output = self
            .oci
            .create_job(&JobCreate {
                stack_id: &stack_id,
                job_type: JobType::Apply,
                strategy: Some(strategy),
                plan_job_id: plan_job_id.as_deref(),
            })
            .await?;
        let job_id = output
            .data_str("id")
            .ok_or_else(|| DeployError::missing_job_id("apply"))?
            .to_string();
        let status = output
            .data_str("lifecycle-state")
            .unwrap_or(STATUS_ACCEPTED)
            .to_string();

        append_job(
            &self.records,
            &self.locks,
            id,
            RmJobRecord::new(job_id.clone(), JobType::Apply, status.clone()),
        )
        .await?;

        self.log
            .info(
                &id,
                "run_apply",
                &format!("Apply job created: {}", job_id),
                Some(json!({
                    "stack_id": stack_id,
                    "strategy": strategy.as_str(),
                    "plan_job_id": plan_job_id,
                })),
            )
            .await;

        Ok(RunApplyResult {
            job_id,
            status,
            plan_job_id,
        })
    }
}

fn resolve_plan_job(state: &DeployState, explicit: Option<String>) -> Result<String, DeployError> {
    explicit
        .filter(|id| !id.trim().is_empty())
        .or_else(|| state.latest_job(JobType::Plan).map(|job| job.job_id.clone()))
        .ok_or(DeployError::NoPlanJob(state.session_id))
}
