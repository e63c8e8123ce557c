//! ExportIacHandler - writes infrastructure files for a session.
//!
//! The files land in `output/{id}/terraform/`, where `create_stack` picks
//! them up.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::records::{terraform_dir, Records};
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::foundation::SessionId;
use crate::domain::hearing::HearingError;
use crate::ports::{validate_filename, DocumentStore};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IacFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportIacCommand {
    pub session_id: SessionId,
    pub files: Vec<IacFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportIacResult {
    pub session_id: SessionId,
    pub files: Vec<String>,
}

pub struct ExportIacHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
}

impl ExportIacHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog) -> Self {
        Self { records, locks, log }
    }

    /// # Errors
    ///
    /// - `ValidationError` when no files are given
    /// - `InvalidFilename` when any name could escape the directory
    pub async fn handle(&self, cmd: ExportIacCommand) -> Result<ExportIacResult, HearingError> {
        let id = cmd.session_id;
        if cmd.files.is_empty() {
            return Err(HearingError::validation("files", "at least one file is required"));
        }
        for file in &cmd.files {
            validate_filename(&file.name)?;
        }

        let _guard = self.locks.acquire(id).await;
        self.records.load_session(&id).await?;

        let dir = terraform_dir(&id);
        let mut written = Vec::with_capacity(cmd.files.len());
        for file in &cmd.files {
            let path = format!("{}/{}", dir, file.name);
            self.records.store().write_text(&path, &file.content).await?;
            written.push(path);
        }

        self.log
            .info(&id, "export_iac", "Infrastructure files exported", Some(json!({ "files": written })))
            .await;

        Ok(ExportIacResult {
            session_id: id,
            files: written,
        })
    }
}
