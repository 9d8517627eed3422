use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{default_flow, Application, ApplicationDraft, ApplicationId};
use super::pipeline::{PipelineError, StageAction, StageCommand};
use super::repository::{ApplicationRepository, ModifyError};
use crate::workflows::errors::{RepositoryError, ValidationError};
use crate::workflows::events::{
    ReconsiderationOutcome, ReconsiderationRequested, ReconsiderationSink, SinkError,
};

/// Action payload accepted by `POST /applications/{id}/action`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default, alias = "ministry")]
    pub organization: Option<String>,
    #[serde(default)]
    pub signer: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ActionRequest {
    fn into_command(self) -> Result<StageCommand, PipelineError> {
        let action: StageAction = self.action.parse()?;
        Ok(StageCommand {
            action,
            organization: self.organization,
            signer: self.signer.filter(|signer| !signer.trim().is_empty()),
            reason: self.reason,
        })
    }
}

/// Service owning application creation, stage transitions and the reopen back-channel.
pub struct ClaimPipelineService<R> {
    repository: Arc<R>,
    default_flow: Vec<String>,
    sequence: AtomicU64,
}

impl<R> ClaimPipelineService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_default_flow(repository, default_flow())
    }

    /// Uses `flow` for submissions without a custom sequence. An empty flow falls back to
    /// the built-in four-stage sequence.
    pub fn with_default_flow(repository: Arc<R>, flow: Vec<String>) -> Self {
        let default_flow = if flow.is_empty() { default_flow() } else { flow };
        Self {
            repository,
            default_flow,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn default_flow(&self) -> &[String] {
        &self.default_flow
    }

    fn next_application_id(&self) -> ApplicationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        ApplicationId(format!("APP-{id:06}"))
    }

    /// Validate and store a new application in its first active stage.
    pub fn submit(&self, draft: ApplicationDraft) -> Result<Application, ClaimServiceError> {
        let (area_ha, flow) = draft.validate()?;
        let flow = flow.unwrap_or_else(|| self.default_flow.clone());

        let application = Application::open(
            self.next_application_id(),
            draft,
            area_ha,
            flow,
            Utc::now(),
        );
        let stored = self.repository.insert(application)?;

        info!(
            application_id = %stored.id(),
            stages = stored.stages().len(),
            "application submitted"
        );
        Ok(stored)
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<Application, ClaimServiceError> {
        let application = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    pub fn list(&self) -> Result<Vec<Application>, ClaimServiceError> {
        Ok(self.repository.list()?)
    }

    /// Apply an approve/reject/cancel request to the application's current stage.
    pub fn act(
        &self,
        application_id: &ApplicationId,
        request: ActionRequest,
    ) -> Result<Application, ClaimServiceError> {
        let action = request.action.trim().to_ascii_lowercase();
        // A closed application reports its state before the action token is judged.
        let command = request.into_command();
        let at = Utc::now();

        let updated = self
            .repository
            .modify(application_id, &mut |application| {
                application.open_stage()?;
                let command = command.as_ref().map_err(|err| err.clone())?;
                application.apply(command, at)
            })
            .map_err(|err| {
                if let ModifyError::Pipeline(reason) = &err {
                    warn!(application_id = %application_id, %reason, "stage action refused");
                }
                ClaimServiceError::from(err)
            })?;

        info!(
            application_id = %application_id,
            action = %action,
            state = updated.state().label(),
            stage_index = updated.current_stage_index(),
            "stage action applied"
        );
        Ok(updated)
    }

    /// Reopen the most recently decided stage. Returns `None` when the application is unknown.
    pub fn reopen(
        &self,
        application_id: &ApplicationId,
        requested_by: Option<String>,
        reason: Option<String>,
    ) -> Result<Option<Application>, ClaimServiceError> {
        let at = Utc::now();
        let result = self.repository.modify(application_id, &mut |application| {
            application.reopen_previous_stage(requested_by.clone(), reason.clone(), at);
            Ok(())
        });

        match result {
            Ok(application) => {
                info!(
                    application_id = %application_id,
                    stage_index = application.current_stage_index(),
                    "application reopened"
                );
                Ok(Some(application))
            }
            Err(ModifyError::Repository(RepositoryError::NotFound)) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }
}

impl<R> ReconsiderationSink for ClaimPipelineService<R>
where
    R: ApplicationRepository + 'static,
{
    fn publish(
        &self,
        event: ReconsiderationRequested,
    ) -> Result<ReconsiderationOutcome, SinkError> {
        let ReconsiderationRequested {
            app_id,
            requested_by,
            message,
            ..
        } = event;

        match self.reopen(&app_id, Some(requested_by), Some(message)) {
            Ok(Some(application)) => Ok(ReconsiderationOutcome::Reopened {
                stage_index: application.current_stage_index(),
            }),
            Ok(None) => Ok(ReconsiderationOutcome::ApplicationMissing),
            Err(err) => Err(SinkError::Unavailable(err.to_string())),
        }
    }
}

/// Error raised by the claim pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum ClaimServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ModifyError> for ClaimServiceError {
    fn from(value: ModifyError) -> Self {
        match value {
            ModifyError::Repository(err) => Self::Repository(err),
            ModifyError::Pipeline(err) => Self::Pipeline(err),
        }
    }
}
