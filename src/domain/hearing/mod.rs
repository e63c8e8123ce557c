//! Hearing domain module.
//!
//! A hearing is a requirements interview for one infrastructure project.
//! Each session owns a `Session` record and a `HearingResult` document that
//! accumulates answers per category until the session is completed.

mod aggregate;
mod answer;
mod architecture;
mod category;
mod errors;
mod result;

pub use aggregate::{Session, SessionSummary, MAX_DESCRIPTION_LEN};
pub use answer::{AnswerSource, AnswerValue, AnsweredItem, ConfidenceLabel, Estimation};
pub use architecture::{Architecture, Component, Decision, DesignWarning, WarningSeverity};
pub use category::Category;
pub use errors::HearingError;
pub use result::{
    AnswerInput, AnswerMap, HearingMetadata, HearingResult, ProjectOverview, Requirements,
    HEARING_RESULT_VERSION,
};
