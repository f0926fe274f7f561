//! JWT token generation and validation
//!
//! Handles creation and verification of access and refresh tokens. The
//! signing secret and lifetimes are fixed when the [`TokenService`] is built.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::AccountRole;

/// Issuer used when none is configured
pub const DEFAULT_ISSUER: &str = "CorroYouRun";

/// JWT-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            // An unexpected algorithm is treated like a bad signature so that
            // non-HMAC tokens can never be accepted.
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => JwtError::InvalidSignature,
            _ => JwtError::Malformed(e.to_string()),
        }
    }
}

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims shared by access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: Uuid,
    /// Role claim; kept as a raw string so the gate can reject unknown roles
    pub group: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID, unique per issued token
    pub jti: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Signing configuration, loaded once at startup
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Configuration with the default issuer, a 15 minute access lifetime
    /// and a 168 hour refresh lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(168),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"****")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// A freshly issued access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues and validates HMAC-signed tokens
#[derive(Clone)]
pub struct TokenService {
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            validation,
        }
    }

    /// Issue a short-lived access token
    pub fn issue_access_token(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<String, JwtError> {
        self.issue(account_id, role, TokenType::Access, self.access_ttl)
    }

    /// Issue a long-lived refresh token
    pub fn issue_refresh_token(
        &self,
        account_id: Uuid,
        role: AccountRole,
    ) -> Result<String, JwtError> {
        self.issue(account_id, role, TokenType::Refresh, self.refresh_ttl)
    }

    /// Issue both tokens for an account
    pub fn issue_pair(&self, account_id: Uuid, role: AccountRole) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(account_id, role)?,
            refresh_token: self.issue_refresh_token(account_id, role)?,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Verify signature, algorithm, issuer and expiry, then decode the claims
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    fn issue(
        &self,
        account_id: Uuid,
        role: AccountRole,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            group: role.as_str().to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }
}
