//! Best-effort structured log kept alongside each session.
//!
//! Entries go to `sessions/{id}/galley.log`, one JSON object per line, and
//! are mirrored to `tracing`. A failed append is reported once and dropped.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::DocumentStore;

use super::records::log_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    timestamp: Timestamp,
    level: LogLevel,
    tool: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

/// Appends session log entries through the document store.
#[derive(Clone)]
pub struct SessionLog {
    store: Arc<dyn DocumentStore>,
}

impl SessionLog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn info(&self, session_id: &SessionId, tool: &str, message: &str, data: Option<Value>) {
        self.write(session_id, LogLevel::Info, tool, message, data).await;
    }

    pub async fn warning(&self, session_id: &SessionId, tool: &str, message: &str, data: Option<Value>) {
        self.write(session_id, LogLevel::Warning, tool, message, data).await;
    }

    /// Never fails; append errors only reach `tracing`.
    pub async fn write(
        &self,
        session_id: &SessionId,
        level: LogLevel,
        tool: &str,
        message: &str,
        data: Option<Value>,
    ) {
        match level {
            LogLevel::Debug => tracing::debug!(session_id = %session_id, tool, ?data, "{}", message),
            LogLevel::Info => tracing::info!(session_id = %session_id, tool, ?data, "{}", message),
            LogLevel::Warning => tracing::warn!(session_id = %session_id, tool, ?data, "{}", message),
            LogLevel::Error => tracing::error!(session_id = %session_id, tool, ?data, "{}", message),
        }

        let entry = LogEntry {
            timestamp: Timestamp::now(),
            level,
            tool,
            message,
            data: data.as_ref(),
        };
        let mut line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode session log entry");
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.store.append_text(&log_file(session_id), &line).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to write session log");
        }
    }
}
