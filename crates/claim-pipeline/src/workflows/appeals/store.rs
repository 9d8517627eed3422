use std::sync::{Arc, RwLock};

use super::domain::{Appeal, AppealId, AppealReply};
use super::repository::AppealRepository;
use crate::workflows::errors::RepositoryError;

/// In-process appeal store. Replies are appended under the write lock so readers always
/// see whole reply records.
#[derive(Default, Clone)]
pub struct InMemoryAppealStore {
    appeals: Arc<RwLock<Vec<Appeal>>>,
}

impl AppealRepository for InMemoryAppealStore {
    fn insert(&self, appeal: Appeal) -> Result<Appeal, RepositoryError> {
        let mut guard = self.appeals.write().map_err(|_| RepositoryError::poisoned())?;
        if guard.iter().any(|existing| existing.id == appeal.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(appeal.clone());
        Ok(appeal)
    }

    fn fetch(&self, id: &AppealId) -> Result<Option<Appeal>, RepositoryError> {
        let guard = self.appeals.read().map_err(|_| RepositoryError::poisoned())?;
        Ok(guard.iter().find(|appeal| &appeal.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Appeal>, RepositoryError> {
        let guard = self.appeals.read().map_err(|_| RepositoryError::poisoned())?;
        Ok(guard.clone())
    }

    fn append_reply(&self, id: &AppealId, reply: AppealReply) -> Result<Appeal, RepositoryError> {
        let mut guard = self.appeals.write().map_err(|_| RepositoryError::poisoned())?;
        let appeal = guard
            .iter_mut()
            .find(|appeal| &appeal.id == id)
            .ok_or(RepositoryError::NotFound)?;
        appeal.replies.push(reply);
        Ok(appeal.clone())
    }
}
