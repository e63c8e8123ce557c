//! Apply execution plan strategies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an apply job chooses the plan it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionPlanStrategy {
    /// Plan and apply in one job, no review step.
    #[default]
    AutoApproved,
    /// Apply the plan produced by a specific plan job.
    FromPlanJobId,
    /// Let the provider pick the latest plan job on the stack.
    FromLatestPlanJob,
}

impl ExecutionPlanStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPlanStrategy::AutoApproved => "AUTO_APPROVED",
            ExecutionPlanStrategy::FromPlanJobId => "FROM_PLAN_JOB_ID",
            ExecutionPlanStrategy::FromLatestPlanJob => "FROM_LATEST_PLAN_JOB",
        }
    }

    /// Whether a plan job id must be resolved before submitting.
    pub fn needs_plan_job(&self) -> bool {
        matches!(self, ExecutionPlanStrategy::FromPlanJobId)
    }
}

impl fmt::Display for ExecutionPlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
