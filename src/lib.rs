//! CorroYouRun Backend Library
//!
//! Account management with JWT authentication and per-account run records.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod runs;
pub mod state;
pub mod store;
