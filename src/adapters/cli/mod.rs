//! Command-line tool adapters.
//!
//! - **ProcessToolRunner** - Runs real binaries via `tokio::process`
//! - **MockToolRunner** - Scripted runner for tests and dry runs
//! - **OciCli** - Provisioning CLI invocations built on any `ToolRunner`

mod mock_tool_runner;
mod oci_cli;
mod process_tool_runner;

pub use mock_tool_runner::{MockRun, MockToolRunner, RecordedRun};
pub use oci_cli::{CliTool, JobCreate, OciCli, OciCliSettings, StackCreate, WaitFor};
pub use process_tool_runner::{ProcessToolRunner, DEFAULT_MAX_OUTPUT_BYTES};
