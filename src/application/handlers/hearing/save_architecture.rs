//! SaveArchitectureHandler - stores the architecture designed for a session.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::records::{architecture_file, Records};
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::foundation::SessionId;
use crate::domain::hearing::{Architecture, Component, Decision, DesignWarning, HearingError};
use crate::ports::DocumentStoreExt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveArchitectureCommand {
    pub session_id: SessionId,
    pub components: Vec<Component>,
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub warnings: Vec<DesignWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveArchitectureResult {
    pub saved: bool,
    pub session_id: SessionId,
    pub component_count: usize,
}

pub struct SaveArchitectureHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
}

impl SaveArchitectureHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog) -> Self {
        Self { records, locks, log }
    }

    /// Replaces any architecture saved earlier for the session.
    pub async fn handle(&self, cmd: SaveArchitectureCommand) -> Result<SaveArchitectureResult, HearingError> {
        let id = cmd.session_id;
        let architecture = Architecture {
            session_id: id,
            components: cmd.components,
            decisions: cmd.decisions,
            warnings: cmd.warnings,
        };

        let _guard = self.locks.acquire(id).await;
        self.records.load_session(&id).await?;
        self.records
            .store()
            .write_json(&architecture_file(&id), &architecture)
            .await?;

        let component_count = architecture.components.len();
        self.log
            .info(
                &id,
                "save_architecture",
                "Architecture saved",
                Some(json!({ "components": component_count, "warnings": architecture.warnings.len() })),
            )
            .await;

        Ok(SaveArchitectureResult {
            saved: true,
            session_id: id,
            component_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalDocumentStore;
    use crate::domain::foundation::{ErrorCode, OperationError};
    use crate::domain::hearing::{Session, WarningSeverity};
    use crate::ports::DocumentStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup() -> (SaveArchitectureHandler, Records, SessionId, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalDocumentStore::new(temp.path()));
        let records = Records::new(store.clone());
        let session = Session::new(SessionId::new(), "inventory system").unwrap();
        records.save_session(&session).await.unwrap();
        let handler = SaveArchitectureHandler::new(records.clone(), SessionLocks::new(), SessionLog::new(store));
        (handler, records, session.session_id, temp)
    }

    fn command(id: SessionId) -> SaveArchitectureCommand {
        SaveArchitectureCommand {
            session_id: id,
            components: vec![Component {
                category: "compute".to_string(),
                service_name: "OKE".to_string(),
                purpose: "application runtime".to_string(),
                reason: "container workloads".to_string(),
            }],
            decisions: vec![Decision {
                category: "database".to_string(),
                decision: "Autonomous Database".to_string(),
                reason: "managed patching".to_string(),
            }],
            warnings: vec![],
        }
    }

    #[tokio::test]
    async fn writes_architecture_document() {
        let (handler, records, id, _temp) = setup().await;

        let result = handler.handle(command(id)).await.unwrap();

        assert!(result.saved);
        assert_eq!(result.component_count, 1);
        let stored: Architecture = records.store().read_json(&architecture_file(&id)).await.unwrap();
        assert_eq!(stored.session_id, id);
        assert_eq!(stored.decisions[0].decision, "Autonomous Database");
    }

    #[tokio::test]
    async fn saving_again_replaces_the_document() {
        let (handler, records, id, _temp) = setup().await;
        handler.handle(command(id)).await.unwrap();

        let mut second = command(id);
        second.components.clear();
        second.warnings.push(DesignWarning {
            kind: "empty_design".to_string(),
            message: "No components selected".to_string(),
            severity: WarningSeverity::Info,
        });
        handler.handle(second).await.unwrap();

        let stored: Architecture = records.store().read_json(&architecture_file(&id)).await.unwrap();
        assert!(stored.components.is_empty());
        assert_eq!(stored.warnings.len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_writes_nothing() {
        let (handler, records, _id, _temp) = setup().await;
        let other = SessionId::new();

        let err = handler.handle(command(other)).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::SessionNotFound);
        assert!(!records.store().exists(&architecture_file(&other)).await.unwrap());
    }
}
