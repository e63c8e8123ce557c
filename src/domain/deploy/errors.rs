//! Deploy workflow error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, OperationError, SessionId};
use crate::ports::{StorageError, ToolError};

/// Errors raised while driving the provisioning workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("No stack for session {0}. Run create_stack first")]
    NoStack(SessionId),

    #[error("No plan job found for session {0}. Run run_plan first or pass plan_job_id")]
    NoPlanJob(SessionId),

    #[error("Terraform files not found for session {0}. Run export_iac first")]
    TerraformNotExported(SessionId),

    #[error("Failed to archive terraform files: {0}")]
    ArchiveFailed(String),

    #[error("Stack creation response did not contain a stack id")]
    MissingStackId,

    #[error("{operation} job response did not contain a job id")]
    MissingJobId { operation: String },

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DeployError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DeployError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing_job_id(operation: impl Into<String>) -> Self {
        DeployError::MissingJobId {
            operation: operation.into(),
        }
    }

    /// Classifies an archiving failure. A missing archiver stays `ToolNotFound`.
    pub fn from_archive(err: ToolError) -> Self {
        if err.is_not_found() {
            DeployError::Tool(err)
        } else {
            DeployError::ArchiveFailed(err.to_string())
        }
    }
}

impl OperationError for DeployError {
    fn code(&self) -> ErrorCode {
        match self {
            DeployError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            DeployError::NoStack(_)
            | DeployError::NoPlanJob(_)
            | DeployError::TerraformNotExported(_)
            | DeployError::ArchiveFailed(_)
            | DeployError::MissingStackId
            | DeployError::MissingJobId { .. } => ErrorCode::DeployWorkflowError,
            DeployError::Validation { .. } => ErrorCode::ValidationError,
            DeployError::Tool(err) => err.code(),
            DeployError::Storage(err) => err.code(),
        }
    }
}
