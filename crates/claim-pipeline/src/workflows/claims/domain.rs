use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::errors::ValidationError;

/// Organizations reviewing a claim when the submitter supplies no custom flow.
pub const DEFAULT_FLOW: [&str; 4] = ["Gram Sabha", "SDLC", "DLC", "MOTA"];

pub fn default_flow() -> Vec<String> {
    DEFAULT_FLOW.iter().map(|org| org.to_string()).collect()
}

/// Identifier wrapper for submitted claims.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Approved,
    Rejected,
}

impl StageStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One organization's checkpoint within an application's review sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub organization: String,
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Stage {
    pub fn pending(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            status: StageStatus::Pending,
            signed_by: None,
            timestamp: None,
            reason: None,
        }
    }

    pub(crate) fn decide(
        &mut self,
        status: StageStatus,
        signed_by: Option<String>,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.status = status;
        self.signed_by = signed_by;
        self.reason = reason;
        self.timestamp = Some(at);
    }

    pub(crate) fn reset(&mut self) {
        self.status = StageStatus::Pending;
        self.signed_by = None;
        self.timestamp = None;
        self.reason = None;
    }
}

/// Recorded kinds of stage activity in an application's audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Approve,
    Reject,
    Cancel,
    Reopen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageEvent {
    pub stage_index: usize,
    pub organization: String,
    pub action: HistoryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

/// Claim data supplied by a submitter. Geometry and form payloads are stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    #[serde(default)]
    pub claimant_name: String,
    #[serde(default)]
    pub area_ha: Option<f64>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub flow: Option<Vec<String>>,
    #[serde(default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub form_data: Option<Value>,
}

impl ApplicationDraft {
    pub fn new(claimant_name: impl Into<String>, area_ha: f64) -> Self {
        Self {
            claimant_name: claimant_name.into(),
            area_ha: Some(area_ha),
            ..Self::default()
        }
    }

    pub fn with_flow<I, S>(mut self, flow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flow = Some(flow.into_iter().map(Into::into).collect());
        self
    }

    /// Checks required fields and returns the validated area together with the custom flow,
    /// if any was supplied.
    pub(crate) fn validate(&self) -> Result<(f64, Option<Vec<String>>), ValidationError> {
        ValidationError::require(&self.claimant_name, "claimantName")?;

        let area = self
            .area_ha
            .ok_or(ValidationError::MissingField("areaHa"))?;
        if !area.is_finite() || area < 0.0 {
            return Err(ValidationError::InvalidArea);
        }

        let flow = match &self.flow {
            Some(flow) if !flow.is_empty() => {
                if let Some(position) = flow.iter().position(|org| org.trim().is_empty()) {
                    return Err(ValidationError::BlankOrganization(position));
                }
                Some(flow.iter().map(|org| org.trim().to_string()).collect())
            }
            _ => None,
        };

        Ok((area, flow))
    }
}

/// A submitted claim progressing through a fixed, ordered sequence of stages.
///
/// Fields are only mutated through the pipeline transitions in
/// [`crate::workflows::claims::pipeline`], which keep the stage list length fixed and the
/// index within `0..=stages.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub(crate) id: ApplicationId,
    pub(crate) claimant_name: String,
    pub(crate) area_ha: f64,
    pub(crate) geometry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) form_data: Option<Value>,
    pub(crate) stages: Vec<Stage>,
    pub(crate) current_stage_index: usize,
    pub(crate) canceled: bool,
    pub(crate) created_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) history: Vec<StageEvent>,
}

impl Application {
    /// Builds a new application in its first active stage. `flow` must hold at least one
    /// organization; callers fall back to the configured default flow before calling this.
    pub(crate) fn open(
        id: ApplicationId,
        draft: ApplicationDraft,
        area_ha: f64,
        flow: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(!flow.is_empty(), "application flow must not be empty");
        Self {
            id,
            claimant_name: draft.claimant_name.trim().to_string(),
            area_ha,
            geometry: draft.geometry,
            form_type: draft.form_type,
            form_data: draft.form_data,
            stages: flow.into_iter().map(Stage::pending).collect(),
            current_stage_index: 0,
            canceled: false,
            created_at,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &ApplicationId {
        &self.id
    }

    pub fn claimant_name(&self) -> &str {
        &self.claimant_name
    }

    pub fn area_ha(&self) -> f64 {
        self.area_ha
    }

    pub fn geometry(&self) -> Option<&Value> {
        self.geometry.as_ref()
    }

    pub fn form_type(&self) -> Option<&str> {
        self.form_type.as_deref()
    }

    pub fn form_data(&self) -> Option<&Value> {
        self.form_data.as_ref()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn current_stage_index(&self) -> usize {
        self.current_stage_index
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn history(&self) -> &[StageEvent] {
        &self.history
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        self.stages.get(self.current_stage_index)
    }

    /// Organization expected to act next, if the application is still active.
    pub fn awaiting_organization(&self) -> Option<&str> {
        if self.canceled {
            return None;
        }
        self.current_stage().map(|stage| stage.organization.as_str())
    }

    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            state: self.state().label(),
            current_organization: self.awaiting_organization().map(str::to_string),
            application: self.clone(),
        }
    }
}

/// Serialized application enriched with its derived pipeline state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_organization: Option<String>,
}
