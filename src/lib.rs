//! Galley - requirements hearings and infrastructure provisioning.
//!
//! A hearing captures a project's requirements as structured answers in a
//! per-session document. The exported infrastructure files of a session are
//! then bundled into a provisioning stack and driven through plan and apply
//! jobs by an external CLI. All state lives in JSON documents under one data
//! directory.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{Galley, Operation, OperationOutcome};
