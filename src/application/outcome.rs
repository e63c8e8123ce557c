//! OperationOutcome - the envelope every operation returns.
//!
//! ```json
//! {"status": "success", "data": {...}}
//! {"status": "failure", "error": {"kind": "SESSION_NOT_FOUND", "message": "..."}}
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{ErrorCode, OperationError};

/// Message returned for any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OperationOutcome {
    Success { data: Value },
    Failure { error: FailureBody },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureBody {
    pub kind: ErrorCode,
    pub message: String,
}

impl OperationOutcome {
    /// Wraps a handler result.
    pub fn from_result<T, E>(result: Result<T, E>) -> Self
    where
        T: Serialize,
        E: OperationError,
    {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(data) => OperationOutcome::Success { data },
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode operation result");
                    Self::internal()
                }
            },
            Err(err) => Self::failure(&err),
        }
    }

    /// Reports a recognised error. Internal errors are logged and masked.
    pub fn failure(err: &dyn OperationError) -> Self {
        let kind = err.code();
        if kind.is_internal() {
            tracing::error!(error = %err, "Internal error");
            return Self::internal();
        }
        OperationOutcome::Failure {
            error: FailureBody {
                kind,
                message: err.to_string(),
            },
        }
    }

    pub fn internal() -> Self {
        OperationOutcome::Failure {
            error: FailureBody {
                kind: ErrorCode::InternalError,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            OperationOutcome::Success { data } => Some(data),
            OperationOutcome::Failure { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorCode> {
        match self {
            OperationOutcome::Success { .. } => None,
            OperationOutcome::Failure { error } => Some(error.kind),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            OperationOutcome::Success { .. } => None,
            OperationOutcome::Failure { error } => Some(&error.message),
        }
    }
}
