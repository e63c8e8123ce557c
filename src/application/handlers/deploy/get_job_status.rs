//! GetJobStatusHandler - polls one job and refreshes its cached status.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::cli::OciCli;
use crate::application::records::Records;
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::deploy::{DeployError, STATUS_UNKNOWN};
use crate::domain::foundation::SessionId;

/// Placed in `logs_error` when the log fetch fails.
pub const LOGS_ERROR_MESSAGE: &str = "Failed to fetch logs";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GetJobStatusCommand {
    pub session_id: SessionId,
    pub job_id: String,
    #[serde(default)]
    pub include_logs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatusResult {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Whether the job is in the session's local history.
    pub tracked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs_error: Option<String>,
}

pub struct GetJobStatusHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
    oci: OciCli,
}

impl GetJobStatusHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog, oci: OciCli) -> Self {
        Self {
            records,
            locks,
            log,
            oci,
        }
    }

    /// Queries the job. A failed log fetch never fails the call.
    pub async fn handle(&self, cmd: GetJobStatusCommand) -> Result<JobStatusResult, DeployError> {
        let id = cmd.session_id;
        if cmd.job_id.trim().is_empty() {
            return Err(DeployError::validation("job_id", "cannot be empty"));
        }
        if !self.records.session_exists(&id).await? {
            return Err(DeployError::SessionNotFound(id));
        }

        let output = self.oci.get_job(&cmd.job_id).await?;
        let status = output
            .data_str("lifecycle-state")
            .unwrap_or(STATUS_UNKNOWN)
            .to_string();
        let operation = output.data_str("operation").map(str::to_string);

        let tracked = {
            let _guard = self.locks.acquire(id).await;
            let mut state = self.records.load_deploy_state(&id).await?;
            match state.as_mut() {
                Some(state) if state.find_job(&cmd.job_id).is_some() => {
                    state.update_job_status(&cmd.job_id, status.clone());
                    self.records.save_deploy_state(state).await?;
                    true
                }
                _ => false,
            }
        };

        let (logs, logs_error) = if cmd.include_logs {
            match self.oci.get_job_logs(&cmd.job_id).await {
                Ok(logs) => (Some(logs.unwrap_or_default()), None),
                Err(e) => {
                    self.log
                        .warning(
                            &id,
                            "get_job_status",
                            &format!("Failed to fetch logs for job {}", cmd.job_id),
                            Some(json!({ "error": e.to_string() })),
                        )
                        .await;
                    (None, Some(LOGS_ERROR_MESSAGE.to_string()))
                }
            }
        } else {
            (None, None)
        };

        tracing::debug!(session_id = %id, job_id = %cmd.job_id, %status, tracked, "Job status fetched");

        Ok(JobStatusResult {
            job_id: cmd.job_id,
            status,
            operation,
            tracked,
            logs,
            logs_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cli::MockToolRunner;
    use crate::application::handlers::deploy::test_support::DeployFixture;
    use crate::domain::deploy::{JobType, RmJobRecord};
    use crate::domain::foundation::{ErrorCode, OperationError};
    use crate::ports::{DocumentStore, ToolError};

    const JOB_GET: &[&str] = &["resource-manager", "job", "get"];
    const JOB_LOGS: &[&str] = &["resource-manager", "job", "get-job-logs"];

    fn handler(f: &DeployFixture) -> GetJobStatusHandler {
        GetJobStatusHandler::new(f.records.clone(), f.locks.clone(), f.log.clone(), f.oci.clone())
    }

    fn command(id: SessionId, job_id: &str, include_logs: bool) -> GetJobStatusCommand {
        GetJobStatusCommand {
            session_id: id,
            job_id: job_id.to_string(),
            include_logs,
        }
    }

    async fn track(f: &DeployFixture, job_id: &str) {
        let mut state = f.state().await;
        state.push_job(RmJobRecord::new(job_id, JobType::Plan, "ACCEPTED"));
        f.records.save_deploy_state(&state).await.unwrap();
    }

    #[tokio::test]
    async fn tracked_job_status_is_refreshed() {
        let runner = MockToolRunner::new().with_json(
            JOB_GET,
            json!({"data": {"id": "P1", "lifecycle-state": "SUCCEEDED", "operation": "PLAN"}}),
        );
        let f = DeployFixture::with_stack(runner, "S1").await;
        track(&f, "P1").await;

        let result = handler(&f).handle(command(f.id, "P1", false)).await.unwrap();

        assert!(result.tracked);
        assert_eq!(result.status, "SUCCEEDED");
        assert_eq!(result.operation.as_deref(), Some("PLAN"));
        assert_eq!(result.logs, None);

        let job = f.state().await.jobs.into_iter().next().unwrap();
        assert_eq!(job.status, "SUCCEEDED");
        assert!(job.updated_at.is_some());
    }

    #[tokio::test]
    async fn untracked_job_is_still_reported() {
        let runner = MockToolRunner::new().with_json(
            JOB_GET,
            json!({"data": {"id": "X1", "lifecycle-state": "FAILED"}}),
        );
        let f = DeployFixture::with_stack(runner, "S1").await;
        let before = f.state().await;

        let result = handler(&f).handle(command(f.id, "X1", false)).await.unwrap();

        assert!(!result.tracked);
        assert_eq!(result.status, "FAILED");
        assert_eq!(f.state().await, before);
    }

    #[tokio::test]
    async fn works_without_deploy_state() {
        let runner = MockToolRunner::new().with_json(JOB_GET, json!({"data": {}}));
        let f = DeployFixture::new(runner).await;

        let result = handler(&f).handle(command(f.id, "X1", false)).await.unwrap();
        assert!(!result.tracked);
        assert_eq!(result.status, STATUS_UNKNOWN);
    }

    #[tokio::test]
    async fn logs_are_joined() {
        let runner = MockToolRunner::new()
            .with_json(JOB_GET, json!({"data": {"lifecycle-state": "IN_PROGRESS"}}))
            .with_json(
                JOB_LOGS,
                json!({"data": [{"message": "Initializing"}, {"message": "Plan: 3 to add"}]}),
            );
        let f = DeployFixture::with_stack(runner, "S1").await;

        let result = handler(&f).handle(command(f.id, "P1", true)).await.unwrap();
        assert_eq!(result.logs.as_deref(), Some("Initializing\nPlan: 3 to add"));
        assert_eq!(result.logs_error, None);
    }

    #[tokio::test]
    async fn log_failure_degrades_to_marker() {
        let runner = MockToolRunner::new()
            .with_json(JOB_GET, json!({"data": {"lifecycle-state": "FAILED"}}))
            .with_error(JOB_LOGS, ToolError::failed("oci", Some(1), "ServiceError"));
        let f = DeployFixture::with_stack(runner, "S1").await;

        let result = handler(&f).handle(command(f.id, "P1", true)).await.unwrap();

        assert_eq!(result.status, "FAILED");
        assert_eq!(result.logs, None);
        assert_eq!(result.logs_error.as_deref(), Some(LOGS_ERROR_MESSAGE));

        let log = f
            .records
            .store()
            .read_text(&crate::application::records::log_file(&f.id))
            .await
            .unwrap();
        assert!(log.contains("\"level\":\"warning\""));
    }

    #[tokio::test]
    async fn status_failure_fails_the_call() {
        let runner = MockToolRunner::new().with_error(JOB_GET, ToolError::not_found("oci"));
        let f = DeployFixture::with_stack(runner, "S1").await;

        let err = handler(&f).handle(command(f.id, "P1", true)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ToolNotFound);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let f = DeployFixture::new(MockToolRunner::new()).await;
        let err = handler(&f)
            .handle(command(SessionId::new(), "P1", false))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }
}
