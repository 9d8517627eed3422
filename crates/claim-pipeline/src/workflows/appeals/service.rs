use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Appeal, AppealDraft, AppealId, AppealReply, ReconsiderationDraft, ReplyDraft, ReplyKind,
};
use super::repository::AppealRepository;
use crate::workflows::errors::{RepositoryError, ValidationError};
use crate::workflows::events::{
    ReconsiderationOutcome, ReconsiderationRequested, ReconsiderationSink, SinkError,
};
use crate::workflows::query::AppealFilter;

/// Service composing the appeal store with the reconsideration sink.
pub struct AppealService<R, S> {
    repository: Arc<R>,
    sink: Arc<S>,
    sequence: AtomicU64,
}

impl<R, S> AppealService<R, S>
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    pub fn new(repository: Arc<R>, sink: Arc<S>) -> Self {
        Self {
            repository,
            sink,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_appeal_id(&self) -> AppealId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        AppealId(format!("APPEAL-{id:06}"))
    }

    /// Store a new appeal, complaint or suggestion with an empty reply thread.
    ///
    /// The referenced application is not looked up; an appeal may name an id the
    /// application store has never seen.
    pub fn create(&self, draft: AppealDraft) -> Result<Appeal, AppealServiceError> {
        let kind = draft.validate()?;
        let AppealDraft {
            app_id,
            raised_by,
            raised_org,
            target_org,
            message,
            purpose,
            ..
        } = draft;

        let appeal = Appeal {
            id: self.next_appeal_id(),
            app_id: app_id.filter(|id| !id.0.trim().is_empty()),
            raised_by: raised_by.trim().to_string(),
            raised_org,
            target_org,
            kind,
            message,
            purpose,
            created_at: Utc::now(),
            replies: Vec::new(),
        };
        let stored = self.repository.insert(appeal)?;

        info!(
            appeal_id = %stored.id,
            kind = stored.kind.label(),
            target_org = stored.target_org.as_deref().unwrap_or("-"),
            "appeal raised"
        );
        Ok(stored)
    }

    pub fn get(&self, appeal_id: &AppealId) -> Result<Appeal, AppealServiceError> {
        let appeal = self
            .repository
            .fetch(appeal_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(appeal)
    }

    /// Appeals matching `filter`, in creation order.
    pub fn list(&self, filter: &AppealFilter) -> Result<Vec<Appeal>, AppealServiceError> {
        let appeals = self.repository.list()?;
        Ok(filter.apply(appeals))
    }

    pub fn reply(
        &self,
        appeal_id: &AppealId,
        draft: ReplyDraft,
    ) -> Result<Appeal, AppealServiceError> {
        // Unknown ids take precedence over validation failures.
        self.get(appeal_id)?;
        ValidationError::require(&draft.by, "by")?;
        ValidationError::require(&draft.message, "message")?;

        let reply = AppealReply {
            by: draft.by,
            org: draft.org,
            message: draft.message,
            kind: ReplyKind::Reply,
            created_at: Utc::now(),
        };
        let updated = self.repository.append_reply(appeal_id, reply)?;

        info!(appeal_id = %appeal_id, replies = updated.replies.len(), "appeal reply recorded");
        Ok(updated)
    }

    /// Record a reconsideration reply and ask the application side to reopen the referenced
    /// application. A missing application is logged and otherwise ignored.
    pub fn reconsider(
        &self,
        appeal_id: &AppealId,
        draft: ReconsiderationDraft,
    ) -> Result<Appeal, AppealServiceError> {
        let message = draft.message_or_default();
        let reply = AppealReply {
            by: draft.by.clone(),
            org: draft.org.clone(),
            message: message.clone(),
            kind: ReplyKind::Reconsideration,
            created_at: Utc::now(),
        };
        let updated = self.repository.append_reply(appeal_id, reply)?;

        let Some(app_id) = updated.app_id.clone() else {
            info!(appeal_id = %appeal_id, "reconsideration recorded without application reference");
            return Ok(updated);
        };

        let event = ReconsiderationRequested {
            appeal_id: appeal_id.clone(),
            app_id: app_id.clone(),
            requested_by: draft.by,
            organization: draft.org,
            message,
        };
        match self.sink.publish(event)? {
            ReconsiderationOutcome::Reopened { stage_index } => {
                info!(
                    appeal_id = %appeal_id,
                    application_id = %app_id,
                    stage_index,
                    "reconsideration reopened application"
                );
            }
            ReconsiderationOutcome::ApplicationMissing => {
                warn!(
                    appeal_id = %appeal_id,
                    application_id = %app_id,
                    "reconsideration references an unknown application"
                );
            }
        }

        Ok(updated)
    }
}

/// Error raised by the appeal service.
#[derive(Debug, thiserror::Error)]
pub enum AppealServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
