//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Filesystem document store
//! - `cli` - Subprocess tool runners and the provisioning CLI client

pub mod cli;
pub mod storage;

pub use cli::{MockToolRunner, OciCli, OciCliSettings, ProcessToolRunner};
pub use storage::LocalDocumentStore;
