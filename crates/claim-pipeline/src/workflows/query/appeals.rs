use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::workflows::appeals::domain::{Appeal, AppealId, AppealKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealFilter {
    #[serde(default)]
    pub target_org: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<AppealKind>,
}

impl AppealFilter {
    pub fn for_target(target_org: impl Into<String>) -> Self {
        Self {
            target_org: Some(target_org.into()),
            kind: None,
        }
    }

    pub fn matches(&self, appeal: &Appeal) -> bool {
        let target_matches = match self.target_org.as_deref() {
            Some(target) => appeal.target_org.as_deref() == Some(target),
            None => true,
        };
        target_matches && self.kind.map_or(true, |kind| appeal.kind == kind)
    }

    pub fn apply(&self, appeals: Vec<Appeal>) -> Vec<Appeal> {
        appeals
            .into_iter()
            .filter(|appeal| self.matches(appeal))
            .collect()
    }
}

/// Sorts newest first. Appeals created at the same instant are ordered by reverse store
/// order, so the later-issued appeal comes first.
pub fn newest_first(appeals: &mut [Appeal]) {
    appeals.reverse();
    appeals.sort_by(|left, right| right.created_at.cmp(&left.created_at));
}

/// Appeal ids one organization has already opened. The set lives with the client; the
/// server only evaluates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadMarkers {
    seen: HashSet<AppealId>,
}

impl ReadMarkers {
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = AppealId>,
    {
        Self {
            seen: ids.into_iter().collect(),
        }
    }

    pub fn mark_read(&mut self, id: AppealId) -> bool {
        self.seen.insert(id)
    }

    pub fn is_unread(&self, appeal: &Appeal) -> bool {
        !self.seen.contains(&appeal.id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealCounts {
    pub all: usize,
    pub appeals: usize,
    pub complaints: usize,
    pub suggestions: usize,
    pub unread_all: usize,
    pub unread_appeals: usize,
    pub unread_complaints: usize,
    pub unread_suggestions: usize,
}

impl AppealCounts {
    fn record(&mut self, kind: AppealKind, unread: bool) {
        self.all += 1;
        match kind {
            AppealKind::Appeal => self.appeals += 1,
            AppealKind::Complaint => self.complaints += 1,
            AppealKind::Suggestion => self.suggestions += 1,
        }

        if unread {
            self.unread_all += 1;
            match kind {
                AppealKind::Appeal => self.unread_appeals += 1,
                AppealKind::Complaint => self.unread_complaints += 1,
                AppealKind::Suggestion => self.unread_suggestions += 1,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxEntry {
    #[serde(flatten)]
    pub appeal: Appeal,
    pub unread: bool,
}

/// An organization's appeal inbox: counts cover every appeal addressed to it, while
/// `entries` honor the optional type filter and are ordered newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealInbox {
    pub organization: String,
    pub counts: AppealCounts,
    pub entries: Vec<InboxEntry>,
}

impl AppealInbox {
    pub fn build(
        appeals: Vec<Appeal>,
        organization: &str,
        markers: &ReadMarkers,
        kind: Option<AppealKind>,
    ) -> Self {
        let mut addressed = AppealFilter::for_target(organization).apply(appeals);
        newest_first(&mut addressed);

        let mut counts = AppealCounts::default();
        let mut entries = Vec::new();
        for appeal in addressed {
            let unread = markers.is_unread(&appeal);
            counts.record(appeal.kind, unread);
            if kind.map_or(true, |kind| appeal.kind == kind) {
                entries.push(InboxEntry { appeal, unread });
            }
        }

        Self {
            organization: organization.to_string(),
            counts,
            entries,
        }
    }
}
