//! SaveAnswersHandler - records one or many answers on an open hearing.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::records::Records;
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::hearing::{AnswerInput, HearingError};

/// Command to save a single answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveAnswerCommand {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub answer: AnswerInput,
}

/// Command to save several answers at once.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveAnswersBatchCommand {
    pub session_id: SessionId,
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveAnswersResult {
    pub session_id: SessionId,
    pub saved_count: usize,
    pub updated_at: Timestamp,
}

/// Handler for saving answers.
///
/// A batch is validated in full before anything is written.
pub struct SaveAnswersHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
}

impl SaveAnswersHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog) -> Self {
        Self { records, locks, log }
    }

    pub async fn handle_one(&self, cmd: SaveAnswerCommand) -> Result<SaveAnswersResult, HearingError> {
        self.apply(cmd.session_id, vec![cmd.answer], "save_answer").await
    }

    pub async fn handle_batch(&self, cmd: SaveAnswersBatchCommand) -> Result<SaveAnswersResult, HearingError> {
        if cmd.answers.is_empty() {
            return Err(HearingError::validation("answers", "at least one answer is required"));
        }
        self.apply(cmd.session_id, cmd.answers, "save_answers_batch").await
    }

    async fn apply(
        &self,
        id: SessionId,
        answers: Vec<AnswerInput>,
        tool: &str,
    ) -> Result<SaveAnswersResult, HearingError> {
        for answer in &answers {
            answer.validate()?;
        }

        let _guard = self.locks.acquire(id).await;

        let mut session = self.records.load_session(&id).await?;
        session.ensure_mutable()?;
        let mut result = self.records.load_hearing_result(&id).await?;

        let saved_count = answers.len();
        let keys: Vec<String> = answers
            .iter()
            .map(|a| format!("{}.{}", a.category, a.question_id))
            .collect();
        for answer in answers {
            result.apply(answer)?;
        }
        result.touch();
        session.touch();

        self.records.save_hearing_result(&id, &result).await?;
        self.records.save_session(&session).await?;

        self.log
            .info(&id, tool, "Answers saved", Some(json!({ "answers": keys })))
            .await;

        Ok(SaveAnswersResult {
            session_id: id,
            saved_count,
            updated_at: session.updated_at,
        })
    }
}
