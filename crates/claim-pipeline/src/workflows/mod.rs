pub mod appeals;
pub mod claims;
pub mod errors;
pub mod events;
pub(crate) mod http;
pub mod query;

pub use errors::{RepositoryError, ValidationError};
pub use events::{ReconsiderationOutcome, ReconsiderationRequested, ReconsiderationSink, SinkError};
