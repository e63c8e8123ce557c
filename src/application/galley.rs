//! Galley - the facade every caller goes through.
//!
//! Owns the shared collaborators (document store, session locks, session
//! log, CLI client, tool version cache) and builds a handler per call.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::adapters::cli::{OciCli, OciCliSettings};
use crate::adapters::LocalDocumentStore;
use crate::config::GalleyConfig;
use crate::domain::deploy::DeployError;
use crate::domain::foundation::{OperationError, ValidationError};
use crate::domain::hearing::{HearingError, HearingResult};
use crate::ports::{DocumentStore, StorageError, ToolRunner};

use super::handlers::{
    CheckToolsCommand, CheckToolsHandler, CheckToolsResult, CompleteHearingCommand,
    CompleteHearingHandler, CompleteHearingResult, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, CreateStackCommand, CreateStackHandler, CreateStackResult,
    DeleteSessionCommand, DeleteSessionHandler, DeleteSessionResult, ExportIacCommand,
    ExportIacHandler, ExportIacResult, ExportMermaidCommand, ExportMermaidHandler,
    ExportMermaidResult, GetHearingResultCommand, GetHearingResultHandler, GetJobStatusCommand,
    GetJobStatusHandler, InitDataDirHandler, InitDataDirResult, JobStatusResult, JobSubmitted,
    ListSessionsCommand, ListSessionsHandler, ListSessionsResult, RunApplyCommand,
    RunApplyHandler, RunApplyResult, RunPlanCommand, RunPlanHandler, SaveAnswerCommand,
    SaveAnswersBatchCommand, SaveAnswersHandler, SaveAnswersResult, SaveArchitectureCommand,
    SaveArchitectureHandler, SaveArchitectureResult, ToolVersionCache,
};
use super::operation::Operation;
use super::outcome::OperationOutcome;
use super::records::Records;
use super::session_locks::SessionLocks;
use super::session_log::SessionLog;

/// Entry point for all hearing and deploy operations.
///
/// Cloning is cheap; clones share locks and the tool version cache.
#[derive(Clone)]
pub struct Galley {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
    oci: OciCli,
    tool_cache: ToolVersionCache,
}

impl Galley {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        runner: Arc<dyn ToolRunner>,
        settings: OciCliSettings,
    ) -> Self {
        Self {
            records: Records::new(Arc::clone(&store)),
            locks: SessionLocks::new(),
            log: SessionLog::new(store),
            oci: OciCli::new(runner, settings),
            tool_cache: ToolVersionCache::new(),
        }
    }

    /// Wires a local document store and process runner from configuration.
    pub fn from_config(config: &GalleyConfig) -> Self {
        let store = Arc::new(LocalDocumentStore::new(&config.storage.data_dir));
        let runner = Arc::new(config.tools.process_runner());
        Self::new(store, runner, config.tools.oci_settings())
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        self.records.store()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Hearing operations
    // ════════════════════════════════════════════════════════════════════════

    pub async fn init_data_dir(&self) -> Result<InitDataDirResult, StorageError> {
        InitDataDirHandler::new(Arc::clone(self.records.store())).handle().await
    }

    pub async fn create_session(&self, cmd: CreateSessionCommand) -> Result<CreateSessionResult, HearingError> {
        CreateSessionHandler::new(self.records.clone(), self.log.clone())
            .handle(cmd)
            .await
    }

    pub async fn list_sessions(&self, cmd: ListSessionsCommand) -> Result<ListSessionsResult, HearingError> {
        ListSessionsHandler::new(self.records.clone()).handle(cmd).await
    }

    pub async fn delete_session(&self, cmd: DeleteSessionCommand) -> Result<DeleteSessionResult, HearingError> {
        DeleteSessionHandler::new(self.records.clone(), self.locks.clone())
            .handle(cmd)
            .await
    }

    pub async fn save_answer(&self, cmd: SaveAnswerCommand) -> Result<SaveAnswersResult, HearingError> {
        self.save_answers_handler().handle_one(cmd).await
    }

    pub async fn save_answers_batch(
        &self,
        cmd: SaveAnswersBatchCommand,
    ) -> Result<SaveAnswersResult, HearingError> {
        self.save_answers_handler().handle_batch(cmd).await
    }

    pub async fn complete_hearing(
        &self,
        cmd: CompleteHearingCommand,
    ) -> Result<CompleteHearingResult, HearingError> {
        CompleteHearingHandler::new(self.records.clone(), self.locks.clone(), self.log.clone())
            .handle(cmd)
            .await
    }

    pub async fn get_hearing_result(&self, cmd: GetHearingResultCommand) -> Result<HearingResult, HearingError> {
        GetHearingResultHandler::new(self.records.clone()).handle(cmd).await
    }

    pub async fn save_architecture(
        &self,
        cmd: SaveArchitectureCommand,
    ) -> Result<SaveArchitectureResult, HearingError> {
        SaveArchitectureHandler::new(self.records.clone(), self.locks.clone(), self.log.clone())
            .handle(cmd)
            .await
    }

    pub async fn export_iac(&self, cmd: ExportIacCommand) -> Result<ExportIacResult, HearingError> {
        ExportIacHandler::new(self.records.clone(), self.locks.clone(), self.log.clone())
            .handle(cmd)
            .await
    }

    pub async fn export_mermaid(&self, cmd: ExportMermaidCommand) -> Result<ExportMermaidResult, HearingError> {
        ExportMermaidHandler::new(self.records.clone(), self.locks.clone(), self.log.clone())
            .handle(cmd)
            .await
    }

    fn save_answers_handler(&self) -> SaveAnswersHandler {
        SaveAnswersHandler::new(self.records.clone(), self.locks.clone(), self.log.clone())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Deploy operations
    // ════════════════════════════════════════════════════════════════════════

    pub async fn check_tools(&self, cmd: CheckToolsCommand) -> Result<CheckToolsResult, DeployError> {
        CheckToolsHandler::new(self.oci.clone(), self.tool_cache.clone())
            .handle(cmd)
            .await
    }

    pub async fn create_stack(&self, cmd: CreateStackCommand) -> Result<CreateStackResult, DeployError> {
        CreateStackHandler::new(self.records.clone(), self.locks.clone(), self.log.clone(), self.oci.clone())
            .handle(cmd)
            .await
    }

    pub async fn run_plan(&self, cmd: RunPlanCommand) -> Result<JobSubmitted, DeployError> {
        RunPlanHandler::new(self.records.clone(), self.locks.clone(), self.log.clone(), self.oci.clone())
            .handle(cmd)
            .await
    }

    pub async fn run_apply(&self, cmd: RunApplyCommand) -> Result<RunApplyResult, DeployError> {
        RunApplyHandler::new(self.records.clone(), self.locks.clone(), self.log.clone(), self.oci.clone())
            .handle(cmd)
            .await
    }

    pub async fn get_job_status(&self, cmd: GetJobStatusCommand) -> Result<JobStatusResult, DeployError> {
        GetJobStatusHandler::new(self.records.clone(), self.locks.clone(), self.log.clone(), self.oci.clone())
            .handle(cmd)
            .await
    }

    // ════════════════════════════════════════════════════════════════════════
    // Dispatch
    // ════════════════════════════════════════════════════════════════════════

    /// Runs one operation and wraps the result in an outcome envelope.
    ///
    /// The handler runs on its own task; a panic surfaces as an internal
    /// error rather than unwinding into the caller.
    pub async fn dispatch(&self, operation: Operation) -> OperationOutcome {
        let name = operation.name();
        let galley = self.clone();
        let task = tokio::spawn(async move { galley.run(operation).await });

        match task.await {
            Ok(outcome) => {
                tracing::debug!(operation = name, success = outcome.is_success(), "Operation finished");
                outcome
            }
            Err(e) => {
                tracing::error!(operation = name, error = %e, "Operation task failed");
                OperationOutcome::internal()
            }
        }
    }

    /// Parses a JSON request and dispatches it.
    ///
    /// A request that does not parse is reported as `VALIDATION_ERROR`.
    pub async fn call_json(&self, request: Value) -> OperationOutcome {
        match serde_json::from_value::<Operation>(request) {
            Ok(operation) => self.dispatch(operation).await,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected request");
                OperationOutcome::failure(&ValidationError::invalid_format("request", e.to_string()))
            }
        }
    }

    async fn run(&self, operation: Operation) -> OperationOutcome {
        match operation {
            Operation::InitDataDir => wrap(self.init_data_dir().await),
            Operation::CreateSession(cmd) => wrap(self.create_session(cmd).await),
            Operation::ListSessions(cmd) => wrap(self.list_sessions(cmd).await),
            Operation::DeleteSession(cmd) => wrap(self.delete_session(cmd).await),
            Operation::SaveAnswer(cmd) => wrap(self.save_answer(cmd).await),
            Operation::SaveAnswersBatch(cmd) => wrap(self.save_answers_batch(cmd).await),
            Operation::CompleteHearing(cmd) => wrap(self.complete_hearing(cmd).await),
            Operation::GetHearingResult(cmd) => wrap(self.get_hearing_result(cmd).await),
            Operation::SaveArchitecture(cmd) => wrap(self.save_architecture(cmd).await),
            Operation::ExportIac(cmd) => wrap(self.export_iac(cmd).await),
            Operation::ExportMermaid(cmd) => wrap(self.export_mermaid(cmd).await),
            Operation::CheckTools(cmd) => wrap(self.check_tools(cmd).await),
            Operation::CreateStack(cmd) => wrap(self.create_stack(cmd).await),
            Operation::RunPlan(cmd) => wrap(self.run_plan(cmd).await),
            Operation::RunApply(cmd) => wrap(self.run_apply(cmd).await),
            Operation::GetJobStatus(cmd) => wrap(self.get_job_status(cmd).await),
        }
    }
}

fn wrap<T: Serialize, E: OperationError>(result: Result<T, E>) -> OperationOutcome {
    OperationOutcome::from_result(result)
}
