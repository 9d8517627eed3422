use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::appeals::domain::{AppealDraft, AppealKind};
use crate::workflows::appeals::store::InMemoryAppealStore;
use crate::workflows::appeals::{appeal_router, AppealService};
use crate::workflows::claims::domain::ApplicationId;
use crate::workflows::events::{
    ReconsiderationOutcome, ReconsiderationRequested, ReconsiderationSink, SinkError,
};

/// Sink that records every event and answers with a fixed outcome.
pub(super) struct RecordingSink {
    events: Mutex<Vec<ReconsiderationRequested>>,
    outcome: Option<ReconsiderationOutcome>,
}

impl RecordingSink {
    pub(super) fn reopening() -> Self {
        Self::answering(Some(ReconsiderationOutcome::Reopened { stage_index: 0 }))
    }

    pub(super) fn answering(outcome: Option<ReconsiderationOutcome>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            outcome,
        }
    }

    pub(super) fn events(&self) -> Vec<ReconsiderationRequested> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }
}

impl ReconsiderationSink for RecordingSink {
    fn publish(
        &self,
        event: ReconsiderationRequested,
    ) -> Result<ReconsiderationOutcome, SinkError> {
        self.events.lock().expect("sink mutex poisoned").push(event);
        self.outcome
            .ok_or_else(|| SinkError::Unavailable("application store offline".to_string()))
    }
}

pub(super) type TestAppealService = AppealService<InMemoryAppealStore, RecordingSink>;

pub(super) fn build_service() -> (
    TestAppealService,
    Arc<InMemoryAppealStore>,
    Arc<RecordingSink>,
) {
    build_service_with(RecordingSink::reopening())
}

pub(super) fn build_service_with(
    sink: RecordingSink,
) -> (
    TestAppealService,
    Arc<InMemoryAppealStore>,
    Arc<RecordingSink>,
) {
    let store = Arc::new(InMemoryAppealStore::default());
    let sink = Arc::new(sink);
    let service = AppealService::new(store.clone(), sink.clone());
    (service, store, sink)
}

pub(super) fn appeal_draft(app_id: &str, target_org: &str) -> AppealDraft {
    AppealDraft {
        app_id: Some(ApplicationId(app_id.to_string())),
        raised_by: "claimant".to_string(),
        raised_org: Some("NGO".to_string()),
        target_org: Some(target_org.to_string()),
        kind: Some(AppealKind::Appeal),
        message: "Please review the rejection".to_string(),
        purpose: None,
    }
}

pub(super) fn complaint_draft(target_org: &str) -> AppealDraft {
    AppealDraft {
        app_id: None,
        kind: Some(AppealKind::Complaint),
        message: "Office closed during working hours".to_string(),
        ..appeal_draft("", target_org)
    }
}

pub(super) fn appeal_router_with_service(service: TestAppealService) -> axum::Router {
    appeal_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
