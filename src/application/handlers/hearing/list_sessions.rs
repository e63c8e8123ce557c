//! ListSessionsHandler - lists sessions, newest first.

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::application::records::{Records, SESSIONS_DIR};
use crate::domain::foundation::{SessionId, SessionStatus};
use crate::domain::hearing::{HearingError, SessionSummary};
use crate::ports::DocumentStore;

/// Query for sessions, optionally filtered by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListSessionsCommand {
    #[serde(default)]
    pub status: Option<SessionStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSessionsResult {
    pub sessions: Vec<SessionSummary>,
}

pub struct ListSessionsHandler {
    records: Records,
}

impl ListSessionsHandler {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// Unreadable or malformed sessions are skipped, not reported.
    pub async fn handle(&self, cmd: ListSessionsCommand) -> Result<ListSessionsResult, HearingError> {
        let names = self.records.store().list_subdirectories(SESSIONS_DIR).await?;

        let ids: Vec<SessionId> = names
            .iter()
            .filter_map(|name| match name.parse::<SessionId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!(name = %name, "Skipping non-session directory");
                    None
                }
            })
            .collect();

        let loaded = join_all(ids.iter().map(|id| self.records.load_session(id))).await;

        let mut sessions: Vec<SessionSummary> = ids
            .iter()
            .zip(loaded)
            .filter_map(|(id, result)| match result {
                Ok(session) if session.session_id == *id => Some(session),
                Ok(_) => {
                    tracing::debug!(session_id = %id, "Skipping session with mismatched id");
                    None
                }
                Err(e) => {
                    tracing::debug!(session_id = %id, error = %e, "Skipping unreadable session");
                    None
                }
            })
            .filter(|session| cmd.status.map_or(true, |status| session.status == status))
            .map(SessionSummary::from)
            .collect();

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ListSessionsResult { sessions })
    }
}
