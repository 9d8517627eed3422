use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::claims::domain::{Application, ApplicationDraft, ApplicationId};
use crate::workflows::claims::pipeline::PipelineError;
use crate::workflows::claims::repository::{
    ApplicationMutation, ApplicationRepository, ModifyError,
};
use crate::workflows::claims::store::InMemoryApplicationStore;
use crate::workflows::claims::{application_router, ActionRequest, ClaimPipelineService};
use crate::workflows::errors::RepositoryError;

pub(super) fn draft() -> ApplicationDraft {
    ApplicationDraft::new("A", 5.0)
}

pub(super) fn build_service() -> (
    ClaimPipelineService<InMemoryApplicationStore>,
    Arc<InMemoryApplicationStore>,
) {
    let store = Arc::new(InMemoryApplicationStore::default());
    let service = ClaimPipelineService::new(store.clone());
    (service, store)
}

pub(super) fn action(action: &str, organization: &str) -> ActionRequest {
    ActionRequest {
        action: action.to_string(),
        organization: Some(organization.to_string()),
        signer: Some(format!("{organization} officer")),
        reason: None,
    }
}

pub(super) fn application_router_with_service(
    service: ClaimPipelineService<InMemoryApplicationStore>,
) -> axum::Router {
    application_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store that refuses every operation, for exercising failure mapping.
pub(super) struct UnavailableStore;

impl ApplicationRepository for UnavailableStore {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &ApplicationId,
        _mutation: &mut ApplicationMutation<'_>,
    ) -> Result<Application, ModifyError> {
        Err(ModifyError::Repository(RepositoryError::Unavailable(
            "database offline".to_string(),
        )))
    }
}

/// Store whose mutations always fail as if the record were canceled concurrently.
pub(super) struct CanceledStore {
    pub(super) inner: InMemoryApplicationStore,
}

impl ApplicationRepository for CanceledStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list()
    }

    fn modify(
        &self,
        _id: &ApplicationId,
        _mutation: &mut ApplicationMutation<'_>,
    ) -> Result<Application, ModifyError> {
        Err(ModifyError::Pipeline(PipelineError::AlreadyCanceled))
    }
}
