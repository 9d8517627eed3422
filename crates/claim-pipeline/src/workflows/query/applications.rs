use serde::{Deserialize, Serialize};

use crate::workflows::claims::domain::{Application, StageStatus};

/// Coarse status used by dashboards: any rejection wins, then full approval, else pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pending,
    Approved,
    Rejected,
}

impl OverallStatus {
    pub fn of(application: &Application) -> Self {
        let stages = application.stages();
        if application.is_canceled()
            || stages
                .iter()
                .any(|stage| stage.status == StageStatus::Rejected)
        {
            Self::Rejected
        } else if stages
            .iter()
            .all(|stage| stage.status == StageStatus::Approved)
        {
            Self::Approved
        } else {
            Self::Pending
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// True once the application is canceled or has passed every stage.
pub fn is_decided(application: &Application) -> bool {
    application.state().is_terminal()
}

/// Query-string filter for application listings. All criteria are optional and combine with
/// AND; `organization` and `stage_status` together match a single stage holding both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    #[serde(default)]
    pub status: Option<OverallStatus>,
    #[serde(default)]
    pub decided: Option<bool>,
    /// Organization whose turn it is to act.
    #[serde(default)]
    pub awaiting: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub stage_status: Option<StageStatus>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        if let Some(status) = self.status {
            if OverallStatus::of(application) != status {
                return false;
            }
        }

        if let Some(decided) = self.decided {
            if is_decided(application) != decided {
                return false;
            }
        }

        if let Some(awaiting) = self.awaiting.as_deref() {
            if application.awaiting_organization() != Some(awaiting) {
                return false;
            }
        }

        if self.organization.is_some() || self.stage_status.is_some() {
            let organization = self.organization.as_deref();
            let has_stage = application.stages().iter().any(|stage| {
                organization.map_or(true, |org| stage.organization == org)
                    && self.stage_status.map_or(true, |status| stage.status == status)
            });
            if !has_stage {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, applications: Vec<Application>) -> Vec<Application> {
        applications
            .into_iter()
            .filter(|application| self.matches(application))
            .collect()
    }
}
