//! ExportMermaidHandler - writes a caller-supplied diagram to `output/{id}/architecture.mmd`.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::records::{mermaid_file, Records};
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::foundation::SessionId;
use crate::domain::hearing::HearingError;
use crate::ports::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportMermaidCommand {
    pub session_id: SessionId,
    pub mermaid_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportMermaidResult {
    pub session_id: SessionId,
    pub file: String,
}

pub struct ExportMermaidHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
}

impl ExportMermaidHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog) -> Self {
        Self { records, locks, log }
    }

    pub async fn handle(&self, cmd: ExportMermaidCommand) -> Result<ExportMermaidResult, HearingError> {
        let id = cmd.session_id;
        if cmd.mermaid_code.trim().is_empty() {
            return Err(HearingError::validation("mermaid_code", "cannot be empty"));
        }

        let _guard = self.locks.acquire(id).await;
        self.records.load_session(&id).await?;

        let path = mermaid_file(&id);
        self.records.store().write_text(&path, &cmd.mermaid_code).await?;

        self.log
            .info(&id, "export_mermaid", "Diagram exported", Some(json!({ "file": path })))
            .await;

        Ok(ExportMermaidResult {
            session_id: id,
            file: path,
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

    const DIAGRAM: &str = "graph TD\n  lb[Load Balancer] --> app[OKE]\n";

    async fn setup() -> (ExportMermaidHandler, SessionId, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalDocumentStore::new(temp.path()));
        let records = Records::new(store.clone());
        let session = Session::new(SessionId::new(), "inventory system").unwrap();
        records.save_session(&session).await.unwrap();
        let handler = ExportMermaidHandler::new(records, SessionLocks::new(), SessionLog::new(store));
        (handler, session.session_id, temp)
    }

    #[tokio::test]
    async fn writes_diagram_verbatim() {
        let (handler, id, temp) = setup().await;

        let result = handler
            .handle(ExportMermaidCommand {
                session_id: id,
                mermaid_code: DIAGRAM.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.file, format!("output/{}/architecture.mmd", id));
        let written = std::fs::read_to_string(temp.path().join(&result.file)).unwrap();
        assert_eq!(written, DIAGRAM);
    }

    #[tokio::test]
    async fn blank_diagram_is_a_validation_error() {
        let (handler, id, temp) = setup().await;

        let err = handler
            .handle(ExportMermaidCommand {
                session_id: id,
                mermaid_code: "  \n".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(!temp.path().join(format!("output/{}", id)).exists());
    }

    #[tokio::test]
    async fn requires_existing_session() {
        let (handler, _id, _temp) = setup().await;
        let err = handler
            .handle(ExportMermaidCommand {
                session_id: SessionId::new(),
                mermaid_code: DIAGRAM.to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }
}
