//! OCI CLI client - builds provisioning CLI invocations on top of ToolRunner.
//!
//! Every call has the shape
//! `oci <subcommand...> --output json [--<key> <value>]... [--wait-for-state <S> --wait-interval-seconds <n>]`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::domain::deploy::{ExecutionPlanStrategy, JobType};
use crate::ports::{RunOptions, ToolError, ToolOutput, ToolRunner, DEFAULT_TOOL_TIMEOUT};

const STACK_CREATE: &[&str] = &[
    "resource-manager",
    "stack",
    "create",
    "--config-source-type",
    "ZIP_UPLOAD",
];
const JOB_CREATE: &[&str] = &["resource-manager", "job", "create"];
const JOB_GET: &[&str] = &["resource-manager", "job", "get"];
const JOB_GET_LOGS: &[&str] = &["resource-manager", "job", "get-job-logs"];

/// Settings for [`OciCli`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciCliSettings {
    pub oci_path: String,
    pub zip_path: String,
    pub default_timeout: Duration,
    pub stack_wait_timeout: Duration,
    pub wait_interval_secs: u64,
}

impl Default for OciCliSettings {
    fn default() -> Self {
        Self {
            oci_path: "oci".to_string(),
            zip_path: "zip".to_string(),
            default_timeout: DEFAULT_TOOL_TIMEOUT,
            stack_wait_timeout: Duration::from_secs(300),
            wait_interval_secs: 5,
        }
    }
}

/// Binaries the deploy workflow depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliTool {
    Oci,
    Zip,
}

impl CliTool {
    pub const ALL: [CliTool; 2] = [CliTool::Oci, CliTool::Zip];

    pub fn name(&self) -> &'static str {
        match self {
            CliTool::Oci => "oci",
            CliTool::Zip => "zip",
        }
    }
}

/// Lifecycle state to block on before a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitFor<'a> {
    pub state: &'a str,
    pub timeout: Duration,
}

/// Arguments for a stack create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackCreate<'a> {
    pub compartment_id: &'a str,
    pub config_source: &'a Path,
    pub display_name: &'a str,
    pub terraform_version: Option<&'a str>,
}

/// Arguments for a job create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCreate<'a> {
    pub stack_id: &'a str,
    pub job_type: JobType,
    /// Apply only.
    pub strategy: Option<ExecutionPlanStrategy>,
    /// Apply with `FROM_PLAN_JOB_ID` only.
    pub plan_job_id: Option<&'a str>,
}

/// Thin client for the provisioning CLI and the archiver.
#[derive(Clone)]
pub struct OciCli {
    runner: Arc<dyn ToolRunner>,
    settings: OciCliSettings,
}

impl OciCli {
    pub fn new(runner: Arc<dyn ToolRunner>, settings: OciCliSettings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &OciCliSettings {
        &self.settings
    }

    /// Builds the argument vector for one invocation.
    pub fn build_args(
        &self,
        subcommand: &[&str],
        args: &[(&str, &str)],
        wait: Option<&WaitFor<'_>>,
    ) -> Vec<String> {
        let mut cli_args: Vec<String> = subcommand.iter().map(|s| s.to_string()).collect();
        cli_args.push("--output".to_string());
        cli_args.push("json".to_string());
        for (key, value) in args {
            cli_args.push(format!("--{}", key));
            cli_args.push(value.to_string());
        }
        if let Some(wait) = wait {
            cli_args.push("--wait-for-state".to_string());
            cli_args.push(wait.state.to_string());
            cli_args.push("--wait-interval-seconds".to_string());
            cli_args.push(self.settings.wait_interval_secs.to_string());
        }
        cli_args
    }

    /// Runs one provisioning CLI command.
    pub async fn execute(
        &self,
        subcommand: &[&str],
        args: &[(&str, &str)],
        wait: Option<WaitFor<'_>>,
    ) -> Result<ToolOutput, ToolError> {
        let cli_args = self.build_args(subcommand, args, wait.as_ref());
        let timeout = wait
            .map(|w| w.timeout)
            .unwrap_or(self.settings.default_timeout);
        tracing::debug!(args = ?cli_args, "OCI CLI execute");
        self.runner
            .run(
                &self.settings.oci_path,
                &cli_args,
                RunOptions::new().with_timeout(timeout),
            )
            .await
    }

    /// Bundles `source_dir` into a zip at `output_path`.
    pub async fn create_zip(&self, source_dir: &Path, output_path: &Path) -> Result<(), ToolError> {
        self.runner.archive(source_dir, output_path).await
    }

    /// Creates a stack from a zip and waits for it to become ACTIVE.
    pub async fn create_stack(&self, request: &StackCreate<'_>) -> Result<ToolOutput, ToolError> {
        let config_source = request.config_source.to_string_lossy();
        let mut args = vec![
            ("compartment-id", request.compartment_id),
            ("config-source", config_source.as_ref()),
            ("display-name", request.display_name),
        ];
        if let Some(version) = request.terraform_version {
            args.push(("terraform-version", version));
        }
        let wait = WaitFor {
            state: "ACTIVE",
            timeout: self.settings.stack_wait_timeout,
        };
        self.execute(STACK_CREATE, &args, Some(wait)).await
    }

    /// Submits a plan or apply job.
    pub async fn create_job(&self, request: &JobCreate<'_>) -> Result<ToolOutput, ToolError> {
        let mut args = vec![
            ("stack-id", request.stack_id),
            ("operation", request.job_type.operation()),
        ];
        if let Some(strategy) = request.strategy {
            args.push(("execution-plan-strategy", strategy.as_str()));
        }
        if let Some(plan_job_id) = request.plan_job_id {
            args.push(("execution-plan-job-id", plan_job_id));
        }
        self.execute(JOB_CREATE, &args, None).await
    }

    pub async fn get_job(&self, job_id: &str) -> Result<ToolOutput, ToolError> {
        self.execute(JOB_GET, &[("job-id", job_id)], None).await
    }

    /// Fetches job logs, joining entry messages with newlines.
    ///
    /// Returns `None` when the response carries no log array.
    pub async fn get_job_logs(&self, job_id: &str) -> Result<Option<String>, ToolError> {
        let output = self.execute(JOB_GET_LOGS, &[("job-id", job_id)], None).await?;
        Ok(join_log_messages(output.parsed.as_ref()))
    }

    /// Returns the version banner of one of the binaries this client uses.
    pub async fn check_version(&self, tool: CliTool) -> Result<String, ToolError> {
        let path = match tool {
            CliTool::Oci => &self.settings.oci_path,
            CliTool::Zip => &self.settings.zip_path,
        };
        self.runner.check_available(path).await
    }
}

fn join_log_messages(parsed: Option<&Value>) -> Option<String> {
    let entries = parsed?.get("data")?.as_array()?;
    let lines: Vec<&str> = entries
        .iter()
        .map(|entry| entry.get("message").and_then(Value::as_str).unwrap_or(""))
        .collect();
    Some(lines.join("\n"))
}
