//! Answered items - one data point captured during a hearing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar value of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        AnswerValue::Bool(b)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n.into())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(b) => write!(f, "{}", b),
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    UserSelected,
    UserFreeText,
    Estimated,
    NotAnswered,
}

/// How much an estimate can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    PublicReference,
    GeneralEstimate,
}

/// Reasoning attached to an estimated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimation {
    pub confidence_label: ConfidenceLabel,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_info: Option<String>,
}

/// One answered (or explicitly unanswered) question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredItem {
    pub value: AnswerValue,
    pub source: AnswerSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimation: Option<Estimation>,
}

impl AnsweredItem {
    pub fn new(value: impl Into<AnswerValue>, source: AnswerSource) -> Self {
        Self {
            value: value.into(),
            source,
            estimation: None,
        }
    }

    pub fn with_estimation(mut self, estimation: Estimation) -> Self {
        self.estimation = Some(estimation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answer_value_accepts_string_number_and_bool() {
        let text: AnswerValue = serde_json::from_value(json!("500")).unwrap();
        let number: AnswerValue = serde_json::from_value(json!(500)).unwrap();
        let float: AnswerValue = serde_json::from_value(json!(99.9)).unwrap();
        let flag: AnswerValue = serde_json::from_value(json!(true)).unwrap();

        assert_eq!(text, AnswerValue::Text("500".to_string()));
        assert_eq!(number, AnswerValue::from(500));
        assert_eq!(serde_json::to_value(&float).unwrap(), json!(99.9));
        assert_eq!(flag, AnswerValue::Bool(true));
    }

    #[test]
    fn answer_value_rejects_objects() {
        let result: Result<AnswerValue, _> = serde_json::from_value(json!({"a": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn answered_item_omits_absent_estimation() {
        let item = AnsweredItem::new("500", AnswerSource::UserSelected);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"value": "500", "source": "user_selected"})
        );
    }

    #[test]
    fn answered_item_keeps_estimation() {
        let item = AnsweredItem::new(1000, AnswerSource::Estimated).with_estimation(Estimation {
            confidence_label: ConfidenceLabel::GeneralEstimate,
            reasoning: "typical for retail".to_string(),
            source_info: None,
        });
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["estimation"]["confidence_label"], "general_estimate");
        assert_eq!(value["source"], "estimated");
    }

    #[test]
    fn unknown_source_is_rejected() {
        let result: Result<AnsweredItem, _> =
            serde_json::from_value(json!({"value": "x", "source": "guessed"}));
        assert!(result.is_err());
    }
}
