//! HearingResult - the structured answer document for one session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{SessionId, SessionStatus, Timestamp};

use super::{AnsweredItem, Category, HearingError};

/// Schema version written into every hearing result.
pub const HEARING_RESULT_VERSION: &str = "1.0.0";

/// Answers in one category, keyed by question id.
pub type AnswerMap = BTreeMap<String, AnsweredItem>;

/// Persisted in `sessions/{id}/hearing-result.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HearingResult {
    pub metadata: HearingMetadata,
    pub project_overview: ProjectOverview,
    #[serde(default)]
    pub requirements: Requirements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HearingMetadata {
    pub hearing_id: SessionId,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    pub version: String,
    pub status: SessionStatus,
}

/// The project description plus answers such as `industry` or `project_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectOverview {
    pub description: String,
    #[serde(flatten)]
    pub answers: AnswerMap,
}

/// One optional slot per requirement category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<AnswerMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_schedule: Option<AnswerMap>,
}

impl Requirements {
    fn slot_mut(&mut self, category: Category) -> Option<&mut Option<AnswerMap>> {
        let slot = match category {
            Category::ProjectOverview => return None,
            Category::Scale => &mut self.scale,
            Category::Traffic => &mut self.traffic,
            Category::Database => &mut self.database,
            Category::Network => &mut self.network,
            Category::Security => &mut self.security,
            Category::Availability => &mut self.availability,
            Category::Performance => &mut self.performance,
            Category::Operations => &mut self.operations,
            Category::BudgetSchedule => &mut self.budget_schedule,
        };
        Some(slot)
    }

    /// Answers recorded for a requirement category, if any slot exists.
    pub fn get(&self, category: Category) -> Option<&AnswerMap> {
        match category {
            Category::ProjectOverview => None,
            Category::Scale => self.scale.as_ref(),
            Category::Traffic => self.traffic.as_ref(),
            Category::Database => self.database.as_ref(),
            Category::Network => self.network.as_ref(),
            Category::Security => self.security.as_ref(),
            Category::Availability => self.availability.as_ref(),
            Category::Performance => self.performance.as_ref(),
            Category::Operations => self.operations.as_ref(),
            Category::BudgetSchedule => self.budget_schedule.as_ref(),
        }
    }
}

/// One answer to apply, as received from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerInput {
    pub category: Category,
    pub question_id: String,
    #[serde(flatten)]
    pub item: AnsweredItem,
}

impl AnswerInput {
    /// Checks the answer can be applied without touching any document.
    pub fn validate(&self) -> Result<(), HearingError> {
        if self.question_id.trim().is_empty() {
            return Err(HearingError::validation("question_id", "cannot be empty"));
        }
        if self.category == Category::ProjectOverview && self.question_id == "description" {
            return Err(HearingError::validation(
                "question_id",
                "'description' is reserved in project_overview",
            ));
        }
        Ok(())
    }
}

impl HearingResult {
    /// Creates the empty document for a new session.
    pub fn new(hearing_id: SessionId, description: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            metadata: HearingMetadata {
                hearing_id,
                created_at,
                updated_at: None,
                version: HEARING_RESULT_VERSION.to_string(),
                status: SessionStatus::InProgress,
            },
            project_overview: ProjectOverview {
                description: description.into(),
                answers: AnswerMap::new(),
            },
            requirements: Requirements::default(),
        }
    }

    /// Returns the answer map for a category, creating it if needed.
    pub fn answers_mut(&mut self, category: Category) -> &mut AnswerMap {
        match self.requirements.slot_mut(category) {
            Some(slot) => slot.get_or_insert_with(AnswerMap::new),
            None => &mut self.project_overview.answers,
        }
    }

    /// Returns the answer map for a category, if present.
    pub fn answers(&self, category: Category) -> Option<&AnswerMap> {
        match category {
            Category::ProjectOverview => Some(&self.project_overview.answers),
            other => self.requirements.get(other),
        }
    }

    /// Records an answer. Last write wins; no history is kept.
    pub fn apply(&mut self, answer: AnswerInput) -> Result<(), HearingError> {
        answer.validate()?;
        self.answers_mut(answer.category)
            .insert(answer.question_id, answer.item);
        Ok(())
    }

    pub fn touch(&mut self) {
        self.metadata.updated_at = Some(Timestamp::now());
    }

    /// Marks the document completed, mirroring the session.
    pub fn complete(&mut self) {
        self.metadata.status = SessionStatus::Completed;
        self.touch();
    }

    /// Counts requirement categories holding at least one answer.
    pub fn answered_requirement_categories(&self) -> usize {
        Category::REQUIREMENTS
            .iter()
            .filter(|c| self.requirements.get(**c).is_some_and(|m| !m.is_empty()))
            .count()
    }
}
