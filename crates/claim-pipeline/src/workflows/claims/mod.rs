//! Application store and stage pipeline engine.
//!
//! Applications move through an ordered list of reviewing organizations. Each organization
//! approves or rejects its own stage in turn; any actor may cancel. The store serializes
//! mutations per application id.

pub mod domain;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    default_flow, Application, ApplicationDraft, ApplicationId, ApplicationView, HistoryAction,
    Stage, StageEvent, StageStatus, DEFAULT_FLOW,
};
pub use pipeline::{PipelineError, PipelineState, StageAction, StageCommand};
pub use repository::{ApplicationMutation, ApplicationRepository, ModifyError};
pub use router::application_router;
pub use service::{ActionRequest, ClaimPipelineService, ClaimServiceError};
pub use store::InMemoryApplicationStore;
