//! Mock Tool Runner for testing.
//!
//! Stands in for the provisioning CLI and archiver so workflows can be
//! exercised without any external binary.
//!
//! # Features
//!
//! - Scripted responses matched by subcommand prefix
//! - Configurable tool versions for availability checks
//! - Archive success (writes a placeholder bundle) or injected failure
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let runner = MockToolRunner::new()
//!     .with_json(&["resource-manager", "job", "create"], json!({"data": {"id": "J1"}}));
//!
//! let output = runner.run("oci", &args, RunOptions::new()).await?;
//! assert_eq!(output.data_str("id"), Some("J1"));
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{RunOptions, ToolError, ToolOutput, ToolRunner};

/// A scripted reply to one `run` call.
#[derive(Debug, Clone)]
pub enum MockRun {
    /// Exit successfully with this stdout.
    Stdout(String),
    /// Fail with this error.
    Error(ToolError),
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: Vec<String>,
    reply: MockRun,
}

/// One recorded `run` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub tool: String,
    pub args: Vec<String>,
    pub options: RunOptions,
}

impl RecordedRun {
    /// Value following `--{flag}` in the recorded arguments.
    pub fn flag(&self, flag: &str) -> Option<&str> {
        let key = format!("--{}", flag);
        self.args
            .iter()
            .position(|a| *a == key)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Mock tool runner for testing.
#[derive(Debug, Clone, Default)]
pub struct MockToolRunner {
    rules: Arc<Mutex<VecDeque<Rule>>>,
    versions: Arc<Mutex<HashMap<String, Result<String, ToolError>>>>,
    archive_error: Arc<Mutex<Option<ToolError>>>,
    runs: Arc<Mutex<Vec<RecordedRun>>>,
    archives: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    version_checks: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next `run` whose args start with `prefix`.
    pub fn with_reply(self, prefix: &[&str], reply: MockRun) -> Self {
        self.push_reply(prefix, reply);
        self
    }

    /// Queues a JSON stdout reply.
    pub fn with_json(self, prefix: &[&str], value: Value) -> Self {
        self.with_reply(prefix, MockRun::Stdout(value.to_string()))
    }

    /// Queues a failure reply.
    pub fn with_error(self, prefix: &[&str], error: ToolError) -> Self {
        self.with_reply(prefix, MockRun::Error(error))
    }

    /// Reports `version` for `tool` in availability checks.
    pub fn with_version(self, tool: &str, version: &str) -> Self {
        lock(&self.versions).insert(tool.to_string(), Ok(version.to_string()));
        self
    }

    /// Makes availability checks for `tool` fail.
    pub fn with_version_error(self, tool: &str, error: ToolError) -> Self {
        lock(&self.versions).insert(tool.to_string(), Err(error));
        self
    }

    /// Makes every `archive` call fail.
    pub fn with_archive_error(self, error: ToolError) -> Self {
        *lock(&self.archive_error) = Some(error);
        self
    }

    /// Queues a reply on an already shared runner.
    pub fn push_reply(&self, prefix: &[&str], reply: MockRun) {
        lock(&self.rules).push_back(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            reply,
        });
    }

    /// Returns all recorded `run` calls.
    pub fn runs(&self) -> Vec<RecordedRun> {
        lock(&self.runs).clone()
    }

    /// Returns recorded `run` calls whose args start with `prefix`.
    pub fn runs_matching(&self, prefix: &[&str]) -> Vec<RecordedRun> {
        self.runs()
            .into_iter()
            .filter(|run| starts_with(&run.args, prefix))
            .collect()
    }

    /// Returns recorded `(source_dir, output_path)` archive calls.
    pub fn archives(&self) -> Vec<(PathBuf, PathBuf)> {
        lock(&self.archives).clone()
    }

    /// Number of availability checks performed.
    pub fn version_check_count(&self) -> usize {
        lock(&self.version_checks).len()
    }

    /// Number of scripted replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        lock(&self.rules).len()
    }

    fn take_reply(&self, args: &[String]) -> Option<MockRun> {
        let mut rules = lock(&self.rules);
        let index = rules.iter().position(|rule| {
            let prefix: Vec<&str> = rule.prefix.iter().map(String::as_str).collect();
            starts_with(args, &prefix)
        })?;
        rules.remove(index).map(|rule| rule.reply)
    }
}

fn starts_with(args: &[String], prefix: &[&str]) -> bool {
    args.len() >= prefix.len() && args.iter().zip(prefix).all(|(a, p)| a == p)
}

#[async_trait]
impl ToolRunner for MockToolRunner {
    async fn check_available(&self, tool: &str) -> Result<String, ToolError> {
        lock(&self.version_checks).push(tool.to_string());
        lock(&self.versions)
            .get(tool)
            .cloned()
            .unwrap_or_else(|| Err(ToolError::not_found(tool)))
    }

    async fn run(&self, tool: &str, args: &[String], options: RunOptions) -> Result<ToolOutput, ToolError> {
        lock(&self.runs).push(RecordedRun {
            tool: tool.to_string(),
            args: args.to_vec(),
            options,
        });

        match self.take_reply(args) {
            Some(MockRun::Stdout(stdout)) => Ok(ToolOutput::from_stdout(stdout)),
            Some(MockRun::Error(err)) => Err(err),
            None => Err(ToolError::failed(
                format!("{} {}", tool, args.join(" ")),
                Some(1),
                "no scripted response",
            )),
        }
    }

    async fn archive(&self, source_dir: &Path, output_path: &Path) -> Result<(), ToolError> {
        lock(&self.archives).push((source_dir.to_path_buf(), output_path.to_path_buf()));

        let archive_error = lock(&self.archive_error).clone();
        if let Some(err) = archive_error {
            return Err(err);
        }
        tokio::fs::write(output_path, b"PK\x05\x06")
            .await
            .map_err(|e| ToolError::io("zip", e.to_string()))
    }
}
