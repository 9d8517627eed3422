/// Caller-fixable input problems raised before any store is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("areaHa must be a finite, non-negative number")]
    InvalidArea,
    #[error("stage flow has a blank organization at position {0}")]
    BlankOrganization(usize),
    #[error("appeals of type 'appeal' must reference an application (appId)")]
    MissingApplicationReference,
}

impl ValidationError {
    pub(crate) fn require(value: &str, field: &'static str) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::MissingField(field))
        } else {
            Ok(())
        }
    }
}

/// Error enumeration for store failures shared by the application and appeal stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub(crate) fn poisoned() -> Self {
        Self::Unavailable("store lock poisoned".to_string())
    }
}
