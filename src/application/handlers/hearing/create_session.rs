//! CreateSessionHandler - starts a new hearing.

use serde::{Deserialize, Serialize};

use crate::application::records::Records;
use crate::application::session_log::SessionLog;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::hearing::{HearingError, HearingResult, Session};

/// Command to create a new session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateSessionCommand {
    pub project_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSessionResult {
    pub session_id: SessionId,
    pub created_at: Timestamp,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    records: Records,
    log: SessionLog,
}

impl CreateSessionHandler {
    pub fn new(records: Records, log: SessionLog) -> Self {
        Self { records, log }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<CreateSessionResult, HearingError> {
        let session = Session::new(SessionId::new(), cmd.project_description)?;
        let result = HearingResult::new(
            session.session_id,
            session.project_description.clone(),
            session.created_at,
        );

        // session.json last: a readable session always has its hearing result.
        self.records
            .save_hearing_result(&session.session_id, &result)
            .await?;
        self.records.save_session(&session).await?;

        self.log
            .info(&session.session_id, "create_session", "Session created", None)
            .await;

        Ok(CreateSessionResult {
            session_id: session.session_id,
            created_at: session.created_at,
        })
    }
}
