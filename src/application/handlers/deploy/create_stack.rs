//! CreateStackHandler - bundles exported files into a provisioning stack.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

use crate::adapters::cli::{OciCli, StackCreate};
use crate::application::records::{terraform_dir, Records};
use crate::application::session_locks::SessionLocks;
use crate::application::session_log::SessionLog;
use crate::domain::deploy::{DeployError, DeployState, StackInfo};
use crate::domain::foundation::SessionId;
use crate::ports::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateStackCommand {
    pub session_id: SessionId,
    pub compartment_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub terraform_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateStackResult {
    pub stack_id: String,
    pub display_name: String,
}

pub struct CreateStackHandler {
    records: Records,
    locks: SessionLocks,
    log: SessionLog,
    oci: OciCli,
}

impl CreateStackHandler {
    pub fn new(records: Records, locks: SessionLocks, log: SessionLog, oci: OciCli) -> Self {
        Self {
            records,
            locks,
            log,
            oci,
        }
    }

    /// # Errors
    ///
    /// - `SessionNotFound` if the session does not exist
    /// - `DeployWorkflowError` if no files were exported, archiving fails,
    ///   or the response carries no stack id
    /// - `ToolNotFound` / `ToolExecutionError` from the CLI itself
    pub async fn handle(&self, cmd: CreateStackCommand) -> Result<CreateStackResult, DeployError> {
        let id = cmd.session_id;
        if cmd.compartment_id.trim().is_empty() {
            return Err(DeployError::validation("compartment_id", "cannot be empty"));
        }
        if !self.records.session_exists(&id).await? {
            return Err(DeployError::SessionNotFound(id));
        }

        let store = self.records.store();
        let source = terraform_dir(&id);
        if !store.exists(&source).await? {
            return Err(DeployError::TerraformNotExported(id));
        }
        let source_dir = store.validate_path(&source)?;

        let display_name = cmd
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("galley-{}", id.short()));

        let bundle = bundle_path(&id);
        self.oci
            .create_zip(&source_dir, &bundle)
            .await
            .map_err(DeployError::from_archive)?;

        let response = self
            .oci
            .create_stack(&StackCreate {
                compartment_id: &cmd.compartment_id,
                config_source: &bundle,
                display_name: &display_name,
                terraform_version: cmd.terraform_version.as_deref(),
            })
            .await;

        if let Err(e) = tokio::fs::remove_file(&bundle).await {
            tracing::debug!(path = %bundle.display(), error = %e, "Could not remove stack bundle");
        }

        let output = response?;
        let stack_id = output
            .data_str("id")
            .ok_or(DeployError::MissingStackId)?
            .to_string();

        let stack = StackInfo {
            stack_id: stack_id.clone(),
            display_name: display_name.clone(),
            compartment_id: cmd.compartment_id,
            terraform_version: cmd.terraform_version,
        };

        {
            let _guard = self.locks.acquire(id).await;
            if !self.records.session_exists(&id).await? {
                return Err(DeployError::SessionNotFound(id));
            }
            let state = match self.records.load_deploy_state(&id).await? {
                Some(mut state) => {
                    state.set_stack(stack);
                    state
                }
                None => DeployState::new(id, stack),
            };
            self.records.save_deploy_state(&state).await?;
        }

        self.log
            .info(
                &id,
                "create_stack",
                &format!("Stack created: {}", stack_id),
                Some(json!({ "display_name": display_name })),
            )
            .await;

        Ok(CreateStackResult {
            stack_id,
            display_name,
        })
    }
}

fn bundle_path(id: &SessionId) -> PathBuf {
    std::env::temp_dir().join(format!("galley-{}-{}.zip", id.short(), Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cli::{MockToolRunner, OciCliSettings};
    use crate::adapters::LocalDocumentStore;
    use crate::application::handlers::deploy::test_support::DeletingRunner;
    use crate::application::records::session_dir;
    use crate::domain::deploy::{JobType, RmJobRecord, STATUS_ACCEPTED};
    use crate::domain::foundation::{ErrorCode, OperationError};
    use crate::domain::hearing::Session;
    use crate::ports::ToolError;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    const STACK_CREATE: &[&str] = &["resource-manager", "stack", "create"];

    struct Fixture {
        records: Records,
        runner: MockToolRunner,
        id: SessionId,
        _temp: TempDir,
    }

    impl Fixture {
        async fn new(runner: MockToolRunner, exported: bool) -> Self {
            let temp = TempDir::new().unwrap();
            let records = Records::new(Arc::new(LocalDocumentStore::new(temp.path())));
            let session = Session::new(SessionId::new(), "inventory system").unwrap();
            records.save_session(&session).await.unwrap();
            if exported {
                records
                    .store()
                    .write_text(&format!("{}/main.tf", terraform_dir(&session.session_id)), "")
                    .await
                    .unwrap();
            }
            Self {
                records,
                runner,
                id: session.session_id,
                _temp: temp,
            }
        }

        fn handler(&self) -> CreateStackHandler {
            let store = Arc::clone(self.records.store());
            CreateStackHandler::new(
                self.records.clone(),
                SessionLocks::new(),
                SessionLog::new(store),
                OciCli::new(Arc::new(self.runner.clone()), OciCliSettings::default()),
            )
        }

        fn command(&self) -> CreateStackCommand {
            CreateStackCommand {
                session_id: self.id,
                compartment_id: "ocid1.compartment.oc1..aaa".to_string(),
                display_name: None,
                terraform_version: None,
            }
        }
    }

    #[tokio::test]
    async fn creates_stack_and_persists_state() {
        let runner = MockToolRunner::new().with_json(STACK_CREATE, json!({"data": {"id": "S1"}}));
        let f = Fixture::new(runner, true).await;

        let result = f.handler().handle(f.command()).await.unwrap();

        assert_eq!(result.stack_id, "S1");
        assert_eq!(result.display_name, format!("galley-{}", f.id.short()));
        let state = f.records.load_deploy_state(&f.id).await.unwrap().unwrap();
        assert_eq!(state.stack_id.as_deref(), Some("S1"));
        assert!(state.jobs.is_empty());

        let (source, bundle) = &f.runner.archives()[0];
        assert!(source.ends_with(format!("output/{}/terraform", f.id)));
        assert!(!bundle.exists());
        let bundle_arg = bundle.to_string_lossy().into_owned();
        assert_eq!(f.runner.runs()[0].flag("config-source"), Some(bundle_arg.as_str()));
    }

    #[tokio::test]
    async fn recreating_a_stack_keeps_job_history() {
        let runner = MockToolRunner::new().with_json(STACK_CREATE, json!({"data": {"id": "S2"}}));
        let f = Fixture::new(runner, true).await;
        let mut state = DeployState::new(
            f.id,
            StackInfo {
                stack_id: "S1".to_string(),
                display_name: "old".to_string(),
                compartment_id: "C".to_string(),
                terraform_version: None,
            },
        );
        state.push_job(RmJobRecord::new("P1", JobType::Plan, STATUS_ACCEPTED));
        f.records.save_deploy_state(&state).await.unwrap();

        f.handler().handle(f.command()).await.unwrap();

        let state = f.records.load_deploy_state(&f.id).await.unwrap().unwrap();
        assert_eq!(state.stack_id.as_deref(), Some("S2"));
        assert_eq!(state.jobs.len(), 1);
    }

    #[tokio::test]
    async fn missing_export_is_a_workflow_error() {
        let f = Fixture::new(MockToolRunner::new(), false).await;
        let err = f.handler().handle(f.command()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DeployWorkflowError);
        assert!(err.to_string().contains("export_iac"));
        assert!(f.runner.archives().is_empty());
    }

    #[tokio::test]
    async fn archive_failure_is_a_workflow_error() {
        let runner = MockToolRunner::new().with_archive_error(ToolError::failed("zip -r", Some(15), "cannot write"));
        let f = Fixture::new(runner, true).await;

        let err = f.handler().handle(f.command()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DeployWorkflowError);
        assert!(f.runner.runs().is_empty());
    }

    #[tokio::test]
    async fn response_without_id_is_a_workflow_error() {
        let runner = MockToolRunner::new().with_json(STACK_CREATE, json!({"data": {}}));
        let f = Fixture::new(runner, true).await;

        let err = f.handler().handle(f.command()).await.unwrap_err();
        assert!(matches!(err, DeployError::MissingStackId));
        assert!(f.records.load_deploy_state(&f.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_deleted_during_stack_create_stays_deleted() {
        let f = Fixture::new(MockToolRunner::new(), true).await;
        let runner = DeletingRunner {
            inner: MockToolRunner::new().with_json(STACK_CREATE, json!({"data": {"id": "S1"}})),
            store: Arc::clone(f.records.store()),
            id: f.id,
        };
        let store = Arc::clone(f.records.store());
        let handler = CreateStackHandler::new(
            f.records.clone(),
            SessionLocks::new(),
            SessionLog::new(store.clone()),
            OciCli::new(Arc::new(runner), OciCliSettings::default()),
        );

        let err = handler.handle(f.command()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::SessionNotFound);
        assert!(!store.exists(&session_dir(&f.id)).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let f = Fixture::new(MockToolRunner::new(), true).await;
        let mut cmd = f.command();
        cmd.session_id = SessionId::new();

        let err = f.handler().handle(cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }
}
