//! InitDataDirHandler - prepares the store layout.

use serde::Serialize;
use std::sync::Arc;

use crate::application::records::{OUTPUT_DIR, SESSIONS_DIR};
use crate::ports::{DocumentStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitDataDirResult {
    pub data_dir: String,
}

/// Creates `sessions/` and `output/` under the root. Idempotent.
pub struct InitDataDirHandler {
    store: Arc<dyn DocumentStore>,
}

impl InitDataDirHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<InitDataDirResult, StorageError> {
        self.store.ensure_dir(SESSIONS_DIR).await?;
        self.store.ensure_dir(OUTPUT_DIR).await?;
        tracing::info!(data_dir = %self.store.root().display(), "Data directory initialized");
        Ok(InitDataDirResult {
            data_dir: self.store.root().display().to_string(),
        })
    }
}
