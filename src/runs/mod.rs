//! Run records module
//!
//! Recorded running sessions, always owned by a single account.

mod model;
mod service;

pub use model::*;
pub use service::{RunError, RunService};
