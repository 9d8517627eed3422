use super::domain::{Application, ApplicationId};
use super::pipeline::PipelineError;
use crate::workflows::errors::RepositoryError;

/// Mutation applied to a working copy of a stored application.
pub type ApplicationMutation<'a> = dyn FnMut(&mut Application) -> Result<(), PipelineError> + 'a;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations never hold two applications with the same id and must serialize
/// `modify` calls per id: the mutation sees the latest committed state and its result is
/// committed only when it returns `Ok`.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// All applications in creation order.
    fn list(&self) -> Result<Vec<Application>, RepositoryError>;
    fn modify(
        &self,
        id: &ApplicationId,
        mutation: &mut ApplicationMutation<'_>,
    ) -> Result<Application, ModifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModifyError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
