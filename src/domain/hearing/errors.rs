//! Hearing-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, OperationError, SessionId, SessionStatus};
use crate::ports::StorageError;

/// Errors raised by session and hearing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HearingError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Session {session_id} is {status}: {action}")]
    InvalidSessionStatus {
        session_id: SessionId,
        status: SessionStatus,
        action: String,
    },

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HearingError {
    pub fn not_found(id: SessionId) -> Self {
        HearingError::SessionNotFound(id)
    }

    pub fn invalid_status(session_id: SessionId, status: SessionStatus, action: impl Into<String>) -> Self {
        HearingError::InvalidSessionStatus {
            session_id,
            status,
            action: action.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HearingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Maps a missing session document to `SessionNotFound`.
    pub fn from_session_read(id: SessionId, err: StorageError) -> Self {
        if err.is_not_found() {
            HearingError::SessionNotFound(id)
        } else {
            HearingError::Storage(err)
        }
    }
}

impl OperationError for HearingError {
    fn code(&self) -> ErrorCode {
        match self {
            HearingError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            HearingError::InvalidSessionStatus { .. } => ErrorCode::InvalidSessionStatus,
            HearingError::Validation { .. } => ErrorCode::ValidationError,
            HearingError::Storage(err) => err.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_keep_their_code() {
        let err: HearingError = StorageError::malformed("sessions/x/session.json", "eof").into();
        assert_eq!(err.code(), ErrorCode::FileMalformed);
    }

    #[test]
    fn missing_session_file_becomes_session_not_found() {
        let id = SessionId::new();
        let err = HearingError::from_session_read(id, StorageError::not_found("sessions/x/session.json"));
        assert_eq!(err, HearingError::SessionNotFound(id));
        assert_eq!(err.code(), ErrorCode::SessionNotFound);

        let err = HearingError::from_session_read(id, StorageError::read("p", "denied"));
        assert_eq!(err.code(), ErrorCode::FileReadError);
    }

    #[test]
    fn invalid_status_message_names_state() {
        let id = SessionId::new();
        let err = HearingError::invalid_status(id, SessionStatus::Completed, "cannot save answers");
        assert_eq!(err.to_string(), format!("Session {} is completed: cannot save answers", id));
    }
}
