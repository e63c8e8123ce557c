//! Session record - one hearing engagement.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, SessionStatus, StateMachine, Timestamp};

use super::HearingError;

/// Maximum length of a project description.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// A hearing session as persisted in `sessions/{id}/session.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub status: SessionStatus,
    pub project_description: String,
}

impl Session {
    /// Starts a new in-progress session.
    ///
    /// # Errors
    ///
    /// Returns `HearingError::Validation` if the description is empty or
    /// longer than [`MAX_DESCRIPTION_LEN`] characters.
    pub fn new(session_id: SessionId, project_description: impl Into<String>) -> Result<Self, HearingError> {
        let project_description = project_description.into();
        validate_description(&project_description)?;
        let now = Timestamp::now();
        Ok(Self {
            session_id,
            created_at: now,
            updated_at: now,
            status: SessionStatus::InProgress,
            project_description,
        })
    }

    /// Fails unless answers may still be recorded.
    pub fn ensure_mutable(&self) -> Result<(), HearingError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(HearingError::invalid_status(
                self.session_id,
                self.status,
                "cannot save answers",
            ))
        }
    }

    /// Moves the session to its terminal `completed` state.
    pub fn complete(&mut self) -> Result<(), HearingError> {
        self.status = self
            .status
            .transition_to(SessionStatus::Completed)
            .map_err(|_| HearingError::invalid_status(self.session_id, self.status, "already finished"))?;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

fn validate_description(description: &str) -> Result<(), HearingError> {
    if description.trim().is_empty() {
        return Err(HearingError::validation("project_description", "cannot be empty"));
    }
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(HearingError::validation(
            "project_description",
            format!("must be at most {MAX_DESCRIPTION_LEN} characters, got {len}"),
        ));
    }
    Ok(())
}

/// Listing view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub project_description: String,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Session> for SessionSummary {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.session_id,
            project_description: session.project_description,
            status: session.status,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
