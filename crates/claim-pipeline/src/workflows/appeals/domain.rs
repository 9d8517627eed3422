use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::claims::domain::ApplicationId;
use crate::workflows::errors::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppealId(pub String);

impl fmt::Display for AppealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppealKind {
    #[default]
    Appeal,
    Complaint,
    Suggestion,
}

impl AppealKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Appeal => "appeal",
            Self::Complaint => "complaint",
            Self::Suggestion => "suggestion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Reply,
    Reconsideration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealReply {
    pub by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    pub message: String,
    pub kind: ReplyKind,
    pub created_at: DateTime<Utc>,
}

/// Follow-up submission addressed to an organization. `app_id` is a plain reference; the
/// appeal never owns the application it contests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appeal {
    pub id: AppealId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<ApplicationId>,
    pub raised_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raised_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_org: Option<String>,
    #[serde(rename = "type")]
    pub kind: AppealKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<AppealReply>,
}

/// Payload accepted by `POST /appeals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealDraft {
    #[serde(default)]
    pub app_id: Option<ApplicationId>,
    #[serde(default)]
    pub raised_by: String,
    #[serde(default)]
    pub raised_org: Option<String>,
    #[serde(default)]
    pub target_org: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<AppealKind>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub purpose: Option<String>,
}

impl AppealDraft {
    pub(crate) fn validate(&self) -> Result<AppealKind, ValidationError> {
        ValidationError::require(&self.raised_by, "raisedBy")?;
        ValidationError::require(&self.message, "message")?;

        let kind = self.kind.unwrap_or_default();
        let has_reference = self
            .app_id
            .as_ref()
            .is_some_and(|id| !id.0.trim().is_empty());
        if kind == AppealKind::Appeal && !has_reference {
            return Err(ValidationError::MissingApplicationReference);
        }
        Ok(kind)
    }
}

/// Payload accepted by `POST /appeals/{id}/reply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyDraft {
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Payload accepted by `POST /appeals/{id}/reconsider`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconsiderationDraft {
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ReconsiderationDraft {
    pub(crate) fn message_or_default(&self) -> String {
        if let Some(message) = self.message.as_deref().map(str::trim) {
            if !message.is_empty() {
                return message.to_string();
            }
        }

        match self.org.as_deref().map(str::trim) {
            Some(org) if !org.is_empty() => format!("Request reconsideration by {org}"),
            _ => "Reconsideration requested".to_string(),
        }
    }
}
