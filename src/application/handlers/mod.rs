//! Application handlers.
//!
//! One handler per operation. Handlers take a typed command and return a
//! typed result or the error enum of their domain.

pub mod deploy;
pub mod hearing;

pub use deploy::{
    CheckToolsCommand, CheckToolsHandler, CheckToolsResult, CreateStackCommand, CreateStackHandler,
    CreateStackResult, GetJobStatusCommand, GetJobStatusHandler, JobStatusResult, JobSubmitted,
    RunApplyCommand, RunApplyHandler, RunApplyResult, RunPlanCommand, RunPlanHandler,
    ToolVersionCache, LOGS_ERROR_MESSAGE,
};
pub use hearing::{
    CompleteHearingCommand, CompleteHearingHandler, CompleteHearingResult, CreateSessionCommand,
    CreateSessionHandler, CreateSessionResult, DeleteSessionCommand, DeleteSessionHandler,
    DeleteSessionResult, ExportIacCommand, ExportIacHandler, ExportIacResult,
    ExportMermaidCommand, ExportMermaidHandler, ExportMermaidResult, GetHearingResultCommand,
    GetHearingResultHandler, HearingSummary, IacFile, InitDataDirHandler, InitDataDirResult,
    ListSessionsCommand, ListSessionsHandler, ListSessionsResult, SaveAnswerCommand,
    SaveAnswersBatchCommand, SaveAnswersHandler, SaveAnswersResult, SaveArchitectureCommand,
    SaveArchitectureHandler, SaveArchitectureResult,
};
