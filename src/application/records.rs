//! Typed access to the per-session documents.
//!
//! Records are reconstructed from the store on every call; nothing here
//! caches state between operations.

use std::sync::Arc;

use crate::domain::deploy::DeployState;
use crate::domain::foundation::SessionId;
use crate::domain::hearing::{HearingError, HearingResult, Session};
use crate::ports::{DocumentStore, DocumentStoreExt, StorageError};

pub const SESSIONS_DIR: &str = "sessions";
pub const OUTPUT_DIR: &str = "output";

pub fn session_dir(id: &SessionId) -> String {
    format!("{}/{}", SESSIONS_DIR, id)
}

pub fn session_file(id: &SessionId) -> String {
    format!("{}/session.json", session_dir(id))
}

pub fn hearing_result_file(id: &SessionId) -> String {
    format!("{}/hearing-result.json", session_dir(id))
}

pub fn deploy_state_file(id: &SessionId) -> String {
    format!("{}/deploy-state.json", session_dir(id))
}

pub fn architecture_file(id: &SessionId) -> String {
    format!("{}/architecture.json", session_dir(id))
}

pub fn log_file(id: &SessionId) -> String {
    format!("{}/galley.log", session_dir(id))
}

pub fn output_dir(id: &SessionId) -> String {
    format!("{}/{}", OUTPUT_DIR, id)
}

pub fn mermaid_file(id: &SessionId) -> String {
    format!("{}/architecture.mmd", output_dir(id))
}

pub fn terraform_dir(id: &SessionId) -> String {
    format!("{}/terraform", output_dir(id))
}

/// Loads and saves session documents through a [`DocumentStore`].
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn DocumentStore>,
}

impl Records {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn session_exists(&self, id: &SessionId) -> Result<bool, StorageError> {
        self.store.exists(&session_file(id)).await
    }

    /// # Errors
    ///
    /// `SessionNotFound` when `session.json` is absent.
    pub async fn load_session(&self, id: &SessionId) -> Result<Session, HearingError> {
        self.store
            .read_json(&session_file(id))
            .await
            .map_err(|e| HearingError::from_session_read(*id, e))
    }

    pub async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        self.store
            .write_json(&session_file(&session.session_id), session)
            .await
    }

    /// # Errors
    ///
    /// - `SessionNotFound` when the document is absent
    /// - `FileMalformed` when it does not parse or belongs to another session
    pub async fn load_hearing_result(&self, id: &SessionId) -> Result<HearingResult, HearingError> {
        let path = hearing_result_file(id);
        let result: HearingResult = self
            .store
            .read_json(&path)
            .await
            .map_err(|e| HearingError::from_session_read(*id, e))?;
        if result.metadata.hearing_id != *id {
            return Err(StorageError::malformed(
                path,
                format!("hearing_id {} does not match session", result.metadata.hearing_id),
            )
            .into());
        }
        Ok(result)
    }

    pub async fn save_hearing_result(&self, id: &SessionId, result: &HearingResult) -> Result<(), StorageError> {
        self.store.write_json(&hearing_result_file(id), result).await
    }

    /// Returns `None` when no stack has been created for the session yet.
    pub async fn load_deploy_state(&self, id: &SessionId) -> Result<Option<DeployState>, StorageError> {
        match self.store.read_json(&deploy_state_file(id)).await {
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn save_deploy_state(&self, state: &DeployState) -> Result<(), StorageError> {
        self.store
            .write_json(&deploy_state_file(&state.session_id), state)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalDocumentStore;
    use crate::domain::foundation::{ErrorCode, OperationError, Timestamp};
    use tempfile::TempDir;

    fn records() -> (Records, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalDocumentStore::new(temp.path()));
        (Records::new(store), temp)
    }

    #[test]
    fn paths_follow_layout() {
        let id: SessionId = "0b5f8f3e-8a52-4a59-9f0e-0d3b6c1f2a10".parse().unwrap();
        assert_eq!(session_file(&id), format!("sessions/{}/session.json", id));
        assert_eq!(log_file(&id), format!("sessions/{}/galley.log", id));
        assert_eq!(terraform_dir(&id), format!("output/{}/terraform", id));
    }

    #[tokio::test]
    async fn missing_session_is_session_not_found() {
        let (records, _temp) = records();
        let err = records.load_session(&SessionId::new()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn mismatched_hearing_id_is_malformed() {
        let (records, _temp) = records();
        let id = SessionId::new();
        let other = HearingResult::new(SessionId::new(), "x", Timestamp::now());
        records.save_hearing_result(&id, &other).await.unwrap();

        let err = records.load_hearing_result(&id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileMalformed);
    }

    #[tokio::test]
    async fn absent_deploy_state_is_none() {
        let (records, _temp) = records();
        assert!(records.load_deploy_state(&SessionId::new()).await.unwrap().is_none());
    }
}
