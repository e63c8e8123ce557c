//! SessionStatus enum for tracking the lifecycle of hearing sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a hearing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl SessionStatus {
    /// Returns true if answers can still be recorded.
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl StateMachine for SessionStatus {
    /// Valid transitions:
    /// - InProgress -> Completed
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (InProgress, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::InProgress => vec![SessionStatus::Completed],
            SessionStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
