//! Tool Runner Port - External command execution interface.
//!
//! The deploy workflow drives an external provisioning CLI and an archiving
//! helper. This port is the subprocess boundary: it runs a binary, captures
//! its output, enforces a time bound, and classifies what went wrong.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::{ErrorCode, OperationError};

/// Default bound on a single external invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Port for running external command-line tools.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Returns the tool's version banner.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::NotFound` if the binary cannot be located.
    async fn check_available(&self, tool: &str) -> Result<String, ToolError>;

    /// Runs `tool` with `args` and captures its output.
    ///
    /// Stdout that is not JSON is not an error: `ToolOutput::parsed` is then
    /// `None`.
    async fn run(
        &self,
        tool: &str,
        args: &[String],
        options: RunOptions,
    ) -> Result<ToolOutput, ToolError>;

    /// Produces a compressed bundle of `source_dir` at `output_path`.
    async fn archive(&self, source_dir: &Path, output_path: &Path) -> Result<(), ToolError>;
}

/// Per-invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Working directory for the child process.
    pub cwd: Option<PathBuf>,
    /// Upper bound on wall time; `None` means the runner's default.
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self {
            cwd: None,
            timeout: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Captured result of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub stdout: String,
    pub parsed: Option<Value>,
}

impl ToolOutput {
    /// Builds an output, parsing stdout as JSON when possible.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        let stdout = stdout.into();
        let parsed = serde_json::from_str(stdout.trim()).ok();
        Self { stdout, parsed }
    }

    /// Looks up a string at `data.<field>` in the parsed response.
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.parsed
            .as_ref()
            .and_then(|v| v.get("data"))
            .and_then(|d| d.get(field))
            .and_then(Value::as_str)
    }
}

/// Errors from running external tools.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The binary is not installed or not on PATH.
    #[error("Command not found: {tool}. Please install it and ensure it is on your PATH.")]
    NotFound { tool: String },

    /// The process ran and exited unsuccessfully.
    #[error("Command failed: {command} (exit code {exit_code:?})\n{stderr}")]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The process did not finish within its bound. Its effect is unknown.
    #[error("Command timed out after {timeout_secs}s: {command}")]
    TimedOut { command: String, timeout_secs: u64 },

    /// The process could not be spawned or its output could not be read.
    #[error("Command could not be run: {command}: {reason}")]
    Io { command: String, reason: String },
}

impl ToolError {
    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::NotFound { tool: tool.into() }
    }

    pub fn failed(command: impl Into<String>, exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Failed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    pub fn timed_out(command: impl Into<String>, timeout: Duration) -> Self {
        Self::TimedOut {
            command: command.into(),
            timeout_secs: timeout.as_secs(),
        }
    }

    pub fn io(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ToolError::NotFound { .. })
    }
}

impl OperationError for ToolError {
    fn code(&self) -> ErrorCode {
        match self {
            ToolError::NotFound { .. } => ErrorCode::ToolNotFound,
            _ => ErrorCode::ToolExecutionError,
        }
    }
}
