//! CompleteHearingHandler - closes a hearing for further answers.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::records::Records;
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::foundation::{SessionId, SessionStatus};
use crate::domain::hearing::{Category, HearingError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompleteHearingCommand {
    pub session_id: SessionId,
}

/// Coverage of the requirement categories at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HearingSummary {
    pub total_categories: usize,
    pub answered_categories: usize,
    pub unanswered_categories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteHearingResult {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub summary: HearingSummary,
}

pub struct CompleteHearingHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
}

impl CompleteHearingHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog) -> Self {
        Self { records, locks, log }
    }

    /// # Errors
    ///
    /// `InvalidSessionStatus` if the hearing is already completed.
    pub async fn handle(&self, cmd: CompleteHearingCommand) -> Result<CompleteHearingResult, HearingError> {
        let id = cmd.session_id;
        let _guard = self.locks.acquire(id).await;

        let mut session = self.records.load_session(&id).await?;
        session.complete()?;
        let mut result = self.records.load_hearing_result(&id).await?;
        result.complete();

        // session.json last, as in create_session: until it is written the
        // session still reads in_progress and completing again repairs the pair.
        self.records.save_hearing_result(&id, &result).await?;
        self.records.save_session(&session).await?;

        let total = Category::REQUIREMENTS.len();
        let answered = result.answered_requirement_categories();
        let summary = HearingSummary {
            total_categories: total,
            answered_categories: answered,
            unanswered_categories: total - answered,
        };

        self.log
            .info(&id, "complete_hearing", "Hearing completed", Some(json!(summary)))
            .await;

        Ok(CompleteHearingResult {
            session_id: id,
            status: session.status,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalDocumentStore;
    use crate::domain::foundation::{ErrorCode, OperationError};
    use crate::domain::hearing::{AnswerInput, AnswerSource, AnsweredItem, HearingResult, Session};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn completes_once_and_counts_categories() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalDocumentStore::new(temp.path()));
        let records = Records::new(store.clone());
        let session = Session::new(SessionId::new(), "inventory system").unwrap();
        let id = session.session_id;
        let mut result = HearingResult::new(id, "inventory system", session.created_at);
        for category in [Category::Scale, Category::Database] {
            result
                .apply(AnswerInput {
                    category,
                    question_id: "q".to_string(),
                    item: AnsweredItem::new("x", AnswerSource::UserFreeText),
                })
                .unwrap();
        }
        records.save_hearing_result(&id, &result).await.unwrap();
        records.save_session(&session).await.unwrap();

        let handler = CompleteHearingHandler::new(records.clone(), SessionLocks::new(), SessionLog::new(store));
        let done = handler.handle(CompleteHearingCommand { session_id: id }).await.unwrap();

        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(
            done.summary,
            HearingSummary {
                total_categories: 9,
                answered_categories: 2,
                unanswered_categories: 7,
            }
        );
        let stored = records.load_hearing_result(&id).await.unwrap();
        assert_eq!(stored.metadata.status, SessionStatus::Completed);

        let err = handler
            .handle(CompleteHearingCommand { session_id: id })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidSessionStatus);
    }

    #[tokio::test]
    async fn completing_again_repairs_a_half_written_completion() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(LocalDocumentStore::new(temp.path()));
        let records = Records::new(store.clone());
        let session = Session::new(SessionId::new(), "inventory system").unwrap();
        let id = session.session_id;
        // The result was saved as completed but the session write never happened.
        let mut result = HearingResult::new(id, "inventory system", session.created_at);
        result.complete();
        records.save_hearing_result(&id, &result).await.unwrap();
        records.save_session(&session).await.unwrap();

        let handler = CompleteHearingHandler::new(records.clone(), SessionLocks::new(), SessionLog::new(store));
        let done = handler.handle(CompleteHearingCommand { session_id: id }).await.unwrap();

        assert_eq!(done.status, SessionStatus::Completed);
        assert_eq!(records.load_session(&id).await.unwrap().status, SessionStatus::Completed);
        assert_eq!(
            records.load_hearing_result(&id).await.unwrap().metadata.status,
            SessionStatus::Completed
        );
    }
}
