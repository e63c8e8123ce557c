//! CheckToolsHandler - reports whether the deploy binaries are usable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::cli::{CliTool, OciCli};
use crate::domain::deploy::DeployError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckToolsCommand {
    /// Ignore cached versions and probe again.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckToolsResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oci_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    pub errors: Vec<String>,
}

/// Versions of successfully probed tools.
///
/// Filled on first use and kept until a refresh. Failed probes are never
/// cached, so a tool installed later is picked up on the next check.
#[derive(Debug, Clone, Default)]
pub struct ToolVersionCache {
    versions: Arc<Mutex<HashMap<CliTool, String>>>,
}

impl ToolVersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tool: CliTool) -> Option<String> {
        self.versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tool)
            .cloned()
    }

    pub fn insert(&self, tool: CliTool, version: String) {
        self.versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tool, version);
    }

    pub fn invalidate(&self) {
        self.versions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

pub struct CheckToolsHandler {
    oci: OciCli,
    cache: ToolVersionCache,
}

impl CheckToolsHandler {
    pub fn new(oci: OciCli, cache: ToolVersionCache) -> Self {
        Self { oci, cache }
    }

    pub async fn handle(&self, cmd: CheckToolsCommand) -> Result<CheckToolsResult, DeployError> {
        if cmd.refresh {
            self.cache.invalidate();
        }

        let (oci, zip) = futures::join!(self.probe(CliTool::Oci), self.probe(CliTool::Zip));

        let mut result = CheckToolsResult::default();
        match oci {
            Ok(version) => result.oci_cli = Some(version),
            Err(message) => result.errors.push(message),
        }
        match zip {
            Ok(version) => result.zip = Some(version),
            Err(message) => result.errors.push(message),
        }
        Ok(result)
    }

    async fn probe(&self, tool: CliTool) -> Result<String, String> {
        if let Some(version) = self.cache.get(tool) {
            return Ok(version);
        }
        match self.oci.check_version(tool).await {
            Ok(version) => {
                self.cache.insert(tool, version.clone());
                Ok(version)
            }
            Err(e) => {
                tracing::debug!(tool = tool.name(), error = %e, "Tool check failed");
                Err(format!("{}: {}", tool.name(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cli::{MockToolRunner, OciCliSettings};

    fn handler(runner: &MockToolRunner, cache: &ToolVersionCache) -> CheckToolsHandler {
        let oci = OciCli::new(Arc::new(runner.clone()), OciCliSettings::default());
        CheckToolsHandler::new(oci, cache.clone())
    }

    #[tokio::test]
    async fn reports_versions_and_errors() {
        let runner = MockToolRunner::new().with_version("oci", "3.41.0");
        let cache = ToolVersionCache::new();
        let result = handler(&runner, &cache)
            .handle(CheckToolsCommand::default())
            .await
            .unwrap();

        assert_eq!(result.oci_cli.as_deref(), Some("3.41.0"));
        assert_eq!(result.zip, None);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("zip: Command not found"));
    }

    #[tokio::test]
    async fn successful_probes_are_cached_until_refresh() {
        let runner = MockToolRunner::new()
            .with_version("oci", "3.41.0")
            .with_version("zip", "Zip 3.0");
        let cache = ToolVersionCache::new();
        let handler = handler(&runner, &cache);

        handler.handle(CheckToolsCommand::default()).await.unwrap();
        handler.handle(CheckToolsCommand::default()).await.unwrap();
        assert_eq!(runner.version_check_count(), 2);

        handler.handle(CheckToolsCommand { refresh: true }).await.unwrap();
        assert_eq!(runner.version_check_count(), 4);
    }

    #[tokio::test]
    async fn failed_probes_are_retried() {
        let runner = MockToolRunner::new().with_version("oci", "3.41.0");
        let cache = ToolVersionCache::new();
        let handler = handler(&runner, &cache);

        handler.handle(CheckToolsCommand::default()).await.unwrap();
        handler.handle(CheckToolsCommand::default()).await.unwrap();

        // oci once, zip twice
        assert_eq!(runner.version_check_count(), 3);
        assert_eq!(cache.get(CliTool::Zip), None);
    }
}
