//! API handlers for CorroYouRun backend

pub mod account;
pub mod auth;
pub mod run;

// Re-export AuthenticatedAccount for handler use
pub use crate::auth::AuthenticatedAccount;
