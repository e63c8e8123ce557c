//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Galley domain.

mod errors;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, OperationError, ValidationError};
pub use ids::SessionId;
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
