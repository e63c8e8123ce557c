//! Architecture design saved alongside a hearing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;

/// One service chosen for the design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub category: String,
    pub service_name: String,
    pub purpose: String,
    pub reason: String,
}

/// A recorded design decision and why it was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub category: String,
    pub decision: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignWarning {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub severity: WarningSeverity,
}

/// The `architecture.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    pub session_id: SessionId,
    pub components: Vec<Component>,
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub warnings: Vec<DesignWarning>,
}
