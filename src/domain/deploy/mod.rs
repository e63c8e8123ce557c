//! Deploy domain module.
//!
//! Tracks the provisioning workflow for a session: one stack, then an
//! append-only history of plan and apply jobs whose lifecycle is owned by the
//! external provider and only refreshed when polled.

mod errors;
mod state;
mod strategy;

pub use errors::DeployError;
pub use state::{DeployState, JobType, RmJobRecord, StackInfo, STATUS_ACCEPTED, STATUS_UNKNOWN};
pub use strategy::ExecutionPlanStrategy;
