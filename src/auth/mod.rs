//! Authentication module for CorroYouRun
//!
//! Provides password-based authentication for accounts.
//! - bcrypt password hashing
//! - JWT access/refresh token issuance and validation
//! - Single-session refresh token rotation and logout
//! - Role-based authorization gate for protected routes

mod gate;
mod jwt;
mod password;
mod service;

pub use gate::{authorize, AccessLevel, AuthenticatedAccount, UnauthorizedReason};
pub use jwt::{
    Claims, JwtError, TokenConfig, TokenPair, TokenService, TokenType, DEFAULT_ISSUER,
};
pub use password::{PasswordError, PasswordHasher};
pub use service::{AuthError, AuthService, NewAccount, LOGGED_OUT};
