//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - Sandboxed, atomic persistence under one root
//! - `ToolRunner` - Subprocess execution for the provisioning CLI

mod document_store;
mod tool_runner;

pub use document_store::{validate_filename, DocumentStore, DocumentStoreExt, StorageError};
pub use tool_runner::{RunOptions, ToolError, ToolOutput, ToolRunner, DEFAULT_TOOL_TIMEOUT};
