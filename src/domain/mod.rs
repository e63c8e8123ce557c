//! Domain layer containing the records and rules of the Galley workflow.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, status, error codes)
//! - `hearing` - Sessions, answered items, and the hearing result document
//! - `deploy` - Deploy state, job history, and apply strategies

pub mod deploy;
pub mod foundation;
pub mod hearing;
