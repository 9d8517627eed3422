use claim_pipeline::workflows::appeals::{AppealService, InMemoryAppealStore};
use claim_pipeline::workflows::claims::{ClaimPipelineService, InMemoryApplicationStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type ClaimService = ClaimPipelineService<InMemoryApplicationStore>;
pub(crate) type AppealDesk = AppealService<InMemoryAppealStore, ClaimService>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires both in-memory stores; the claim service doubles as the appeal desk's
/// reconsideration sink.
pub(crate) fn build_services(default_flow: Vec<String>) -> (Arc<ClaimService>, Arc<AppealDesk>) {
    let claims = Arc::new(ClaimPipelineService::with_default_flow(
        Arc::new(InMemoryApplicationStore::default()),
        default_flow,
    ));
    let appeals = Arc::new(AppealService::new(
        Arc::new(InMemoryAppealStore::default()),
        claims.clone(),
    ));
    (claims, appeals)
}
