//! DeleteSessionHandler - removes a session and everything derived from it.

use serde::{Deserialize, Serialize};

use crate::application::records::{output_dir, session_dir, Records};
use crate::application::session_locks::SessionLocks;
use crate::domain::foundation::SessionId;
use crate::domain::hearing::HearingError;
use crate::ports::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteSessionResult {
    pub deleted: bool,
    pub session_id: SessionId,
}

pub struct DeleteSessionHandler {
    records: Records,
    locks: SessionLocks,
}

impl DeleteSessionHandler {
    pub fn new(records: Records, locks: SessionLocks) -> Self {
        Self { records, locks }
    }

    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<DeleteSessionResult, HearingError> {
        let id = cmd.session_id;
        let _guard = self.locks.acquire(id).await;

        if !self.records.session_exists(&id).await? {
            return Err(HearingError::not_found(id));
        }

        let store = self.records.store();
        store.remove_tree(&session_dir(&id)).await?;
        store.remove_tree(&output_dir(&id)).await?;

        // The session log went with the directory.
        tracing::info!(session_id = %id, "Session deleted");

        Ok(DeleteSessionResult {
            deleted: true,
            session_id: id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalDocumentStore;
    use crate::domain::foundation::{ErrorCode, OperationError};
    use crate::domain::hearing::Session;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn removes_session_and_output() {
        let temp = TempDir::new().unwrap();
        let records = Records::new(Arc::new(LocalDocumentStore::new(temp.path())));
        let session = Session::new(SessionId::new(), "inventory system").unwrap();
        let id = session.session_id;
        records.save_session(&session).await.unwrap();
        records
            .store()
            .write_text(&format!("output/{}/terraform/main.tf", id), "terraform {}")
            .await
            .unwrap();

        let handler = DeleteSessionHandler::new(records, SessionLocks::new());
        let result = handler.handle(DeleteSessionCommand { session_id: id }).await.unwrap();

        assert!(result.deleted);
        assert!(!temp.path().join(format!("sessions/{}", id)).exists());
        assert!(!temp.path().join(format!("output/{}", id)).exists());

        let err = handler
            .handle(DeleteSessionCommand { session_id: id })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }
}
