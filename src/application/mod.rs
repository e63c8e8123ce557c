//! Application layer - handlers, the Galley facade, and the outcome envelope.
//!
//! Handlers orchestrate domain types and ports. The facade owns the shared
//! collaborators and turns a tagged [`Operation`] into an [`OperationOutcome`].

mod galley;
pub mod handlers;
mod operation;
mod outcome;
pub mod records;
mod session_locks;
mod session_log;

pub use galley::Galley;
pub use operation::Operation;
pub use outcome::{FailureBody, OperationOutcome, INTERNAL_ERROR_MESSAGE};
pub use records::Records;
pub use session_locks::{SessionGuard, SessionLocks};
pub use session_log::{LogLevel, SessionLog};
