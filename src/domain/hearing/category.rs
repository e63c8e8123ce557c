//! Hearing categories - the closed set of places an answer can land.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A hearing category.
///
/// `ProjectOverview` answers live beside the project description; every
/// other category is a slot under `requirements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ProjectOverview,
    Scale,
    Traffic,
    Database,
    Network,
    Security,
    Availability,
    Performance,
    Operations,
    BudgetSchedule,
}

impl Category {
    /// Categories stored under `requirements`, in hearing order.
    pub const REQUIREMENTS: [Category; 9] = [
        Category::Scale,
        Category::Traffic,
        Category::Database,
        Category::Network,
        Category::Security,
        Category::Availability,
        Category::Performance,
        Category::Operations,
        Category::BudgetSchedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProjectOverview => "project_overview",
            Category::Scale => "scale",
            Category::Traffic => "traffic",
            Category::Database => "database",
            Category::Network => "network",
            Category::Security => "security",
            Category::Availability => "availability",
            Category::Performance => "performance",
            Category::Operations => "operations",
            Category::BudgetSchedule => "budget_schedule",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirements_exclude_project_overview() {
        assert_eq!(Category::REQUIREMENTS.len(), 9);
        assert!(!Category::REQUIREMENTS.contains(&Category::ProjectOverview));
    }

    #[test]
    fn serde_name_matches_as_str() {
        for category in Category::REQUIREMENTS {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn unknown_category_fails_to_parse() {
        let result: Result<Category, _> = serde_json::from_str("\"vibes\"");
        assert!(result.is_err());
    }
}
