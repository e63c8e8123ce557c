//! Process Tool Runner - Implementation of ToolRunner using tokio::process.
//!
//! Spawns external binaries with piped output, bounds each run with
//! `tokio::time::timeout`, and kills the child if the bound elapses.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::ports::{RunOptions, ToolError, ToolOutput, ToolRunner, DEFAULT_TOOL_TIMEOUT};

/// Default cap on captured stdout/stderr (10 MiB per stream).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Runs tools as child processes.
#[derive(Debug, Clone)]
pub struct ProcessToolRunner {
    zip_path: String,
    default_timeout: Duration,
    max_output_bytes: usize,
}

impl ProcessToolRunner {
    pub fn new() -> Self {
        Self {
            zip_path: "zip".to_string(),
            default_timeout: DEFAULT_TOOL_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    /// Set the binary used by [`ToolRunner::archive`].
    pub fn with_zip_path(mut self, zip_path: impl Into<String>) -> Self {
        self.zip_path = zip_path.into();
        self
    }

    /// Set the bound applied when a run does not request its own.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the per-stream capture cap. Output beyond it is discarded.
    pub fn with_max_output_bytes(mut self, max_output_bytes: usize) -> Self {
        self.max_output_bytes = max_output_bytes;
        self
    }

    async fn execute(&self, tool: &str, args: &[String], options: RunOptions) -> Result<Captured, ToolError> {
        let command_line = describe(tool, args);
        let timeout = options.timeout.unwrap_or(self.default_timeout);

        let mut command = Command::new(tool);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }

        tracing::debug!(command = %command_line, timeout_secs = timeout.as_secs(), "Spawning tool");

        let mut child = command.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ToolError::not_found(tool),
            _ => ToolError::io(&command_line, e.to_string()),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = self.max_output_bytes as u64;

        // Dropping this future on timeout drops the child, which kills it.
        let run = async move {
            let (stdout, stderr, status) = tokio::join!(
                read_capped(stdout, limit),
                read_capped(stderr, limit),
                child.wait()
            );
            Ok::<_, std::io::Error>((stdout?, stderr?, status?))
        };

        let (stdout, stderr, status) = tokio::time::timeout(timeout, run)
            .await
            .map_err(|_| ToolError::timed_out(&command_line, timeout))?
            .map_err(|e| ToolError::io(&command_line, e.to_string()))?;

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        let stderr = String::from_utf8_lossy(&stderr).trim().to_string();

        if !status.success() {
            tracing::warn!(command = %command_line, exit_code = ?status.code(), "Tool failed");
            return Err(ToolError::failed(command_line, status.code(), stderr));
        }
        Ok(Captured { stdout })
    }
}

impl Default for ProcessToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

struct Captured {
    stdout: String,
}

/// Reads up to `limit` bytes, then drains the rest so the child never blocks.
async fn read_capped<R>(pipe: Option<R>, limit: u64) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Ok(Vec::new());
    };
    let mut buf = Vec::new();
    (&mut pipe).take(limit).read_to_end(&mut buf).await?;
    tokio::io::copy(&mut pipe, &mut tokio::io::sink()).await?;
    Ok(buf)
}

fn describe(tool: &str, args: &[String]) -> String {
    std::iter::once(tool)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl ToolRunner for ProcessToolRunner {
    async fn check_available(&self, tool: &str) -> Result<String, ToolError> {
        let captured = self
            .execute(tool, &["--version".to_string()], RunOptions::new())
            .await?;
        let version = captured
            .stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();
        Ok(version.to_string())
    }

    async fn run(&self, tool: &str, args: &[String], options: RunOptions) -> Result<ToolOutput, ToolError> {
        let captured = self.execute(tool, args, options).await?;
        Ok(ToolOutput::from_stdout(captured.stdout))
    }

    async fn archive(&self, source_dir: &Path, output_path: &Path) -> Result<(), ToolError> {
        let args = vec![
            "-r".to_string(),
            output_path.to_string_lossy().into_owned(),
            ".".to_string(),
        ];
        tracing::debug!(source = %source_dir.display(), output = %output_path.display(), "Creating archive");
        self.execute(&self.zip_path, &args, RunOptions::new().with_cwd(source_dir))
            .await
            .map(|_| ())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn run_parses_json_stdout() {
        let runner = ProcessToolRunner::new();
        let output = runner
            .run("sh", &sh(r#"echo '{"data": {"id": "S1"}}'"#), RunOptions::new())
            .await
            .unwrap();

        assert_eq!(output.parsed, Some(json!({"data": {"id": "S1"}})));
        assert_eq!(output.data_str("id"), Some("S1"));
    }

    #[tokio::test]
    async fn run_tolerates_plain_text() {
        let runner = ProcessToolRunner::new();
        let output = runner
            .run("sh", &sh("echo hello"), RunOptions::new())
            .await
            .unwrap();

        assert_eq!(output.stdout, "hello\n");
        assert!(output.parsed.is_none());
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let runner = ProcessToolRunner::new();
        let err = runner
            .run("galley-no-such-tool-xyz", &[], RunOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn non_zero_exit_is_failed_with_stderr() {
        let runner = ProcessToolRunner::new();
        let err = runner
            .run("sh", &sh("echo boom >&2; exit 3"), RunOptions::new())
            .await
            .unwrap_err();

        match err {
            ToolError::Failed { exit_code, stderr, .. } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let runner = ProcessToolRunner::new();
        let err = runner
            .run(
                "sh",
                &sh("sleep 5"),
                RunOptions::new().with_timeout(Duration::from_millis(100)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn output_is_capped() {
        let runner = ProcessToolRunner::new().with_max_output_bytes(4);
        let output = runner
            .run("sh", &sh("echo 0123456789"), RunOptions::new())
            .await
            .unwrap();
        assert_eq!(output.stdout, "0123");
    }

    #[tokio::test]
    async fn run_uses_working_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "x").unwrap();

        let runner = ProcessToolRunner::new();
        let output = runner
            .run("sh", &sh("ls"), RunOptions::new().with_cwd(temp.path()))
            .await
            .unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }

    #[tokio::test]
    async fn check_available_returns_first_line() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("fake-tool");
        std::fs::write(&script, "#!/bin/sh\nprintf '\\n  Fake 1.2.3  \\nextra\\n'\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let runner = ProcessToolRunner::new();
        let version = runner.check_available(script.to_str().unwrap()).await.unwrap();
        assert_eq!(version, "Fake 1.2.3");
    }
}
