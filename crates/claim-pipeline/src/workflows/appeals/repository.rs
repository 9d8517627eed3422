use super::domain::{Appeal, AppealId, AppealReply};
use crate::workflows::errors::RepositoryError;

/// Storage abstraction for appeals. Appeals are never deleted and only change by having
/// replies appended.
pub trait AppealRepository: Send + Sync {
    fn insert(&self, appeal: Appeal) -> Result<Appeal, RepositoryError>;
    fn fetch(&self, id: &AppealId) -> Result<Option<Appeal>, RepositoryError>;
    /// All appeals in creation order.
    fn list(&self) -> Result<Vec<Appeal>, RepositoryError>;
    /// Appends `reply` and returns the updated appeal, or `NotFound`.
    fn append_reply(&self, id: &AppealId, reply: AppealReply) -> Result<Appeal, RepositoryError>;
}
