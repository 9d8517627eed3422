use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use super::domain::{Application, ApplicationId};
use super::repository::{ApplicationMutation, ApplicationRepository, ModifyError};
use crate::workflows::errors::RepositoryError;

/// In-process application store with one lock per record.
///
/// The index lock is only held long enough to find or register a record, so mutations on
/// different ids run in parallel while mutations on the same id are serialized.
#[derive(Default, Clone)]
pub struct InMemoryApplicationStore {
    index: Arc<RwLock<StoreIndex>>,
}

#[derive(Default)]
struct StoreIndex {
    order: Vec<ApplicationId>,
    records: HashMap<ApplicationId, Arc<Mutex<Application>>>,
}

impl InMemoryApplicationStore {
    pub fn len(&self) -> usize {
        self.index
            .read()
            .map(|index| index.order.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Arc<Mutex<Application>>>, RepositoryError> {
        let index = self.index.read().map_err(|_| RepositoryError::poisoned())?;
        Ok(index.records.get(id).cloned())
    }
}

impl ApplicationRepository for InMemoryApplicationStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut index = self.index.write().map_err(|_| RepositoryError::poisoned())?;
        if index.records.contains_key(application.id()) {
            return Err(RepositoryError::Conflict);
        }

        let id = application.id().clone();
        index.order.push(id.clone());
        index
            .records
            .insert(id, Arc::new(Mutex::new(application.clone())));
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let Some(record) = self.record(id)? else {
            return Ok(None);
        };
        let guard = record.lock().map_err(|_| RepositoryError::poisoned())?;
        Ok(Some(guard.clone()))
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let records: Vec<Arc<Mutex<Application>>> = {
            let index = self.index.read().map_err(|_| RepositoryError::poisoned())?;
            index
                .order
                .iter()
                .filter_map(|id| index.records.get(id).cloned())
                .collect()
        };

        records
            .iter()
            .map(|record| {
                record
                    .lock()
                    .map(|guard| guard.clone())
                    .map_err(|_| RepositoryError::poisoned())
            })
            .collect()
    }

    fn modify(
        &self,
        id: &ApplicationId,
        mutation: &mut ApplicationMutation<'_>,
    ) -> Result<Application, ModifyError> {
        let record = self.record(id)?.ok_or(RepositoryError::NotFound)?;
        let mut guard = record.lock().map_err(|_| RepositoryError::poisoned())?;

        let mut working = guard.clone();
        mutation(&mut working)?;
        *guard = working.clone();
        Ok(working)
    }
}
