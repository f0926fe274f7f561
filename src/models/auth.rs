//! Authentication request/response models for CorroYouRun

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Signup request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub last_name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "This field is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "This field is required"))]
    pub refresh_token: String,
}

/// Logout request. Without a body the caller's own account is logged out.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub account_id: Option<Uuid>,
}

/// Profile update request. Email is immutable and therefore not accepted;
/// empty or absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub account_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Access/refresh token pair returned by login and refresh
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
