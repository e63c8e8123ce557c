//! Deploy handlers - driving the provisioning CLI from stored session state.

mod check_tools;
mod create_stack;
mod get_job_status;
mod run_apply;
mod run_plan;

pub use check_tools::{CheckToolsCommand, CheckToolsHandler, CheckToolsResult, ToolVersionCache};
pub use create_stack::{CreateStackCommand, CreateStackHandler, CreateStackResult};
pub use get_job_status::{GetJobStatusCommand, GetJobStatusHandler, JobStatusResult, LOGS_ERROR_MESSAGE};
pub use run_apply::{RunApplyCommand, RunApplyHandler, RunApplyResult};
pub use run_plan::{JobSubmitted, RunPlanCommand, RunPlanHandler};

use crate::application::records::Records;
use crate::application::session_locks::SessionLocks;
use crate::domain::deploy::{DeployError, DeployState, RmJobRecord};
use crate::domain::foundation::SessionId;

/// Appends a job to the stored history under the session lock.
///
/// The state is reloaded after the lock is taken so jobs recorded by a
/// concurrent call are kept. A session deleted while the CLI was running
/// stays deleted.
async fn append_job(
    records: &Records,
    locks: &SessionLocks,
    id: SessionId,
    job: RmJobRecord,
) -> Result<(), DeployError> {
    let _guard = locks.acquire(id).await;
    if !records.session_exists(&id).await? {
        return Err(DeployError::SessionNotFound(id));
    }
    let mut state = records
        .load_deploy_state(&id)
        .await?
        .ok_or(DeployError::NoStack(id))?;
    state.push_job(job);
    records.save_deploy_state(&state).await?;
    Ok(())
}

/// Resolves the stack a job targets: the explicit id, else the stored one.
fn resolve_stack_id(state: &DeployState, explicit: Option<String>) -> Result<String, DeployError> {
    explicit
        .filter(|id| !id.trim().is_empty())
        .or_else(|| state.stack_id.clone())
        .ok_or(DeployError::NoStack(state.session_id))
}
