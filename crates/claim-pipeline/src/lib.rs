//! Multi-stage approval pipeline for administrative claims.
//!
//! Claims move through an ordered sequence of reviewing organizations; decided claims can be
//! contested through appeals whose reconsideration reopens the last decided stage.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
