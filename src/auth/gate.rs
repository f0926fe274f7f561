//! Authorization gate
//!
//! Turns a raw `Authorization` header value into an authenticated account,
//! or a reason to refuse the request.

use uuid::Uuid;

use crate::models::AccountRole;

use super::jwt::{TokenService, TokenType};
use super::service::AuthError;

/// Minimum role a route requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// USER or ADMIN
    User,
    /// ADMIN only
    Admin,
}

impl AccessLevel {
    pub fn permits(&self, role: AccountRole) -> bool {
        match self {
            AccessLevel::User => matches!(role, AccountRole::User | AccountRole::Admin),
            AccessLevel::Admin => role == AccountRole::Admin,
        }
    }
}

/// Why the gate refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    MissingToken,
    InvalidToken,
    InvalidRole,
}

impl std::fmt::Display for UnauthorizedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnauthorizedReason::MissingToken => "request missing token",
            UnauthorizedReason::InvalidToken => "invalid token",
            UnauthorizedReason::InvalidRole => "invalid group",
        })
    }
}

/// Caller identity established by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub role: AccountRole,
    pub jti: String,
}

impl AuthenticatedAccount {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }

    /// Accounts may act on themselves; admins may act on anyone
    pub fn can_access(&self, account_id: Uuid) -> bool {
        self.is_admin() || self.account_id == account_id
    }
}

/// Check a raw `Authorization` header against the required access level
pub fn authorize(
    tokens: &TokenService,
    header: Option<&str>,
    level: AccessLevel,
) -> Result<AuthenticatedAccount, AuthError> {
    let token = header
        .and_then(bearer_token)
        .ok_or(AuthError::Unauthorized(UnauthorizedReason::MissingToken))?;

    let claims = tokens.validate(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        AuthError::Unauthorized(UnauthorizedReason::InvalidToken)
    })?;

    if claims.token_type != TokenType::Access {
        return Err(AuthError::Unauthorized(UnauthorizedReason::InvalidToken));
    }

    let role = AccountRole::from_claim(&claims.group)
        .filter(|role| level.permits(*role))
        .ok_or(AuthError::Unauthorized(UnauthorizedReason::InvalidRole))?;

    Ok(AuthenticatedAccount {
        account_id: claims.sub,
        role,
        jti: claims.jti,
    })
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
