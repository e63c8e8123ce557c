//! Storage Adapters
//!
//! Implementations of the DocumentStore port.
//!
//! - **LocalDocumentStore** - Sandboxed JSON/text documents under a root directory

mod local_document_store;

pub use local_document_store::LocalDocumentStore;
