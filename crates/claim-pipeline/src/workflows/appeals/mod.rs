//! Appeals, complaints and suggestions with append-only reply threads.
//!
//! Reconsideration is the one operation that affects applications; it is published as a
//! [`ReconsiderationRequested`](crate::workflows::events::ReconsiderationRequested) event.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Appeal, AppealDraft, AppealId, AppealKind, AppealReply, ReconsiderationDraft, ReplyDraft,
    ReplyKind,
};
pub use repository::AppealRepository;
pub use router::appeal_router;
pub use service::{AppealService, AppealServiceError};
pub use store::InMemoryAppealStore;
