use chrono::{DateTime, Utc};
use serde::Serialize;

use super::applications::OverallStatus;
use crate::workflows::claims::domain::Application;

/// Dashboard totals derived from the current application snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_claims: usize,
    pub approved_claims: usize,
    pub pending_claims: usize,
    pub rejected_claims: usize,
    pub total_area_ha: f64,
    pub last_updated: DateTime<Utc>,
}

impl StatsOverview {
    /// `last_updated` is the latest stage decision or creation time seen, or `now` when the
    /// snapshot is empty.
    pub fn from_applications(applications: &[Application], now: DateTime<Utc>) -> Self {
        let mut overview = Self {
            total_claims: applications.len(),
            approved_claims: 0,
            pending_claims: 0,
            rejected_claims: 0,
            total_area_ha: 0.0,
            last_updated: now,
        };

        let mut latest: Option<DateTime<Utc>> = None;
        for application in applications {
            match OverallStatus::of(application) {
                OverallStatus::Approved => overview.approved_claims += 1,
                OverallStatus::Pending => overview.pending_claims += 1,
                OverallStatus::Rejected => overview.rejected_claims += 1,
            }
            overview.total_area_ha += application.area_ha();

            let touched = application
                .history()
                .iter()
                .map(|event| event.at)
                .chain(std::iter::once(application.created_at()))
                .max();
            latest = latest.max(touched);
        }

        if let Some(latest) = latest {
            overview.last_updated = latest;
        }
        overview
    }
}
