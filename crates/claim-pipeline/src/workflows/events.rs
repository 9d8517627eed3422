//! Domain events crossing from the appeal subsystem into the application store.
//!
//! Appeals only hold an application id, so reconsideration is published as an event and the
//! claims side decides what reopening means. Neither store reaches into the other directly.

use serde::{Deserialize, Serialize};

use super::appeals::domain::AppealId;
use super::claims::domain::ApplicationId;

/// Raised when an appeal asks for its referenced application to be reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconsiderationRequested {
    pub appeal_id: AppealId,
    pub app_id: ApplicationId,
    pub requested_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ReconsiderationOutcome {
    Reopened { stage_index: usize },
    ApplicationMissing,
}

/// Consumer of reconsideration events (the application store in production wiring).
pub trait ReconsiderationSink: Send + Sync {
    fn publish(
        &self,
        event: ReconsiderationRequested,
    ) -> Result<ReconsiderationOutcome, SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("reconsideration sink unavailable: {0}")]
    Unavailable(String),
}
