//! Hearing handlers - session lifecycle, answers, design, and exports.

mod complete_hearing;
mod create_session;
mod delete_session;
mod export_iac;
mod export_mermaid;
mod get_hearing_result;
mod init_data_dir;
mod list_sessions;
mod save_answers;
mod save_architecture;

pub use complete_hearing::{
    CompleteHearingCommand, CompleteHearingHandler, CompleteHearingResult, HearingSummary,
};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler, DeleteSessionResult};
pub use export_iac::{ExportIacCommand, ExportIacHandler, ExportIacResult, IacFile};
pub use export_mermaid::{ExportMermaidCommand, ExportMermaidHandler, ExportMermaidResult};
pub use get_hearing_result::{GetHearingResultCommand, GetHearingResultHandler};
pub use init_data_dir::{InitDataDirHandler, InitDataDirResult};
pub use list_sessions::{ListSessionsCommand, ListSessionsHandler, ListSessionsResult};
pub use save_answers::{
    SaveAnswerCommand, SaveAnswersBatchCommand, SaveAnswersHandler, SaveAnswersResult,
};
pub use save_architecture::{
    SaveArchitectureCommand, SaveArchitectureHandler, SaveArchitectureResult,
};
