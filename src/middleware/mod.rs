//! Middleware for CorroYouRun API
//!
//! This module provides middleware for request tracing and authorization.

pub mod auth;
mod tracing;

pub use auth::{require_admin, require_user};
pub use tracing::request_tracing;
