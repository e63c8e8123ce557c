//! Error types shared across the domain layer.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction and input checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable error kinds reported at the operation boundary.
///
/// The string form is part of the external contract; callers match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Session lifecycle
    SessionNotFound,
    InvalidSessionStatus,

    // Input
    ValidationError,

    // Document store
    FileMissing,
    FileMalformed,
    FileReadError,
    FileWriteError,
    InvalidFilename,
    PathTraversal,

    // External tools
    ToolNotFound,
    ToolExecutionError,

    // Deploy workflow
    DeployWorkflowError,

    InternalError,
}

impl ErrorCode {
    /// Returns the wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::InvalidSessionStatus => "INVALID_SESSION_STATUS",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::FileMissing => "FILE_MISSING",
            ErrorCode::FileMalformed => "FILE_MALFORMED",
            ErrorCode::FileReadError => "FILE_READ_ERROR",
            ErrorCode::FileWriteError => "FILE_WRITE_ERROR",
            ErrorCode::InvalidFilename => "INVALID_FILENAME",
            ErrorCode::PathTraversal => "PATH_TRAVERSAL",
            ErrorCode::ToolNotFound => "TOOL_NOT_FOUND",
            ErrorCode::ToolExecutionError => "TOOL_EXECUTION_ERROR",
            ErrorCode::DeployWorkflowError => "DEPLOY_WORKFLOW_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Internal errors never leak their detail to callers.
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::InternalError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Any error that can cross the operation boundary.
///
/// Implementors classify themselves into a stable [`ErrorCode`]; the
/// boundary uses the code to decide what the caller gets to see.
pub trait OperationError: std::error::Error + Send + Sync + 'static {
    fn code(&self) -> ErrorCode;
}

impl OperationError for ValidationError {
    fn code(&self) -> ErrorCode {
        ErrorCode::ValidationError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("question_id");
        assert_eq!(format!("{}", err), "Field 'question_id' cannot be empty");
    }

    #[test]
    fn validation_error_too_long_displays_correctly() {
        let err = ValidationError::too_long("project_description", 5000, 5001);
        assert_eq!(
            format!("{}", err),
            "Field 'project_description' must be at most 5000 characters, got 5001"
        );
    }

    #[test]
    fn error_code_serializes_as_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::DeployWorkflowError).unwrap(),
            "\"DEPLOY_WORKFLOW_ERROR\""
        );
        assert_eq!(ErrorCode::PathTraversal.to_string(), "PATH_TRAVERSAL");
    }

    #[test]
    fn only_internal_error_is_internal() {
        assert!(ErrorCode::InternalError.is_internal());
        assert!(!ErrorCode::FileMissing.is_internal());
        assert!(!ErrorCode::ToolNotFound.is_internal());
    }

    #[test]
    fn validation_error_maps_to_validation_code() {
        let err = ValidationError::invalid_format("session_id", "not a uuid");
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }
}
