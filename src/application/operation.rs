//! Operation - the tagged request accepted by [`Galley::dispatch`].
//!
//! [`Galley::dispatch`]: super::Galley::dispatch

use serde::Deserialize;

use super::handlers::{
    CheckToolsCommand, CompleteHearingCommand, CreateSessionCommand, CreateStackCommand,
    DeleteSessionCommand, ExportIacCommand, ExportMermaidCommand, GetHearingResultCommand,
    GetJobStatusCommand, ListSessionsCommand, RunApplyCommand, RunPlanCommand, SaveAnswerCommand,
    SaveAnswersBatchCommand, SaveArchitectureCommand,
};

/// A request: `{"operation": "<name>", ...arguments}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    InitDataDir,
    CreateSession(CreateSessionCommand),
    ListSessions(ListSessionsCommand),
    DeleteSession(DeleteSessionCommand),
    SaveAnswer(SaveAnswerCommand),
    SaveAnswersBatch(SaveAnswersBatchCommand),
    CompleteHearing(CompleteHearingCommand),
    GetHearingResult(GetHearingResultCommand),
    SaveArchitecture(SaveArchitectureCommand),
    ExportIac(ExportIacCommand),
    ExportMermaid(ExportMermaidCommand),
    CheckTools(CheckToolsCommand),
    CreateStack(CreateStackCommand),
    RunPlan(RunPlanCommand),
    RunApply(RunApplyCommand),
    GetJobStatus(GetJobStatusCommand),
}

impl Operation {
    /// The wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InitDataDir => "init_data_dir",
            Operation::CreateSession(_) => "create_session",
            Operation::ListSessions(_) => "list_sessions",
            Operation::DeleteSession(_) => "delete_session",
            Operation::SaveAnswer(_) => "save_answer",
            Operation::SaveAnswersBatch(_) => "save_answers_batch",
            Operation::CompleteHearing(_) => "complete_hearing",
            Operation::GetHearingResult(_) => "get_hearing_result",
            Operation::SaveArchitecture(_) => "save_architecture",
            Operation::ExportIac(_) => "export_iac",
            Operation::ExportMermaid(_) => "export_mermaid",
            Operation::CheckTools(_) => "check_tools",
            Operation::CreateStack(_) => "create_stack",
            Operation::RunPlan(_) => "run_plan",
            Operation::RunApply(_) => "run_apply",
            Operation::GetJobStatus(_) => "get_job_status",
        }
    }
}
