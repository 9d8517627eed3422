//! Read-only projections over the application and appeal stores.
//!
//! Nothing here mutates a store; every function takes owned snapshots or slices returned by
//! the repositories.

mod appeals;
mod applications;
mod stats;

pub use appeals::{newest_first, AppealCounts, AppealFilter, AppealInbox, InboxEntry, ReadMarkers};
pub use applications::{is_decided, ApplicationFilter, OverallStatus};
pub use stats::StatsOverview;
