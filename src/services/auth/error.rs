/*
 * Responsibility
 * - Authorization Error: the single failure type produced by the auth core
 * - machine-readable code / human-readable description / HTTP status
 * - IntoResponse renders `{ "code", "description" }` (no internal details)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    HeaderMissing,

    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    #[error("token expired")]
    TokenExpired,

    /// Audience or issuer mismatch.
    #[error("invalid claims: audience or issuer")]
    InvalidClaims,

    /// Token carries no `permissions` claim at all.
    #[error("invalid claims: permissions missing")]
    PermissionsMissing,

    #[error("permission not found")]
    Unauthorized,

    /// Identity provider unreachable or returned garbage. Operational, not a denial.
    #[error("signing key set unavailable: {0}")]
    KeySetUnavailable(String),
}

pub const DESC_HEADER_MISSING: &str = "Authorization header is expected";
pub const DESC_BEARER_SCHEME: &str = "Authorization header must start with \"Bearer\"";
pub const DESC_TOKEN_NOT_FOUND: &str = "Token not found";
pub const DESC_NOT_BEARER_TOKEN: &str = "Authorization header must be bearer token";
pub const DESC_MALFORMED: &str = "Authorization malformed";
pub const DESC_UNPARSABLE: &str = "Unable to parse authentication token";
pub const DESC_KEY_NOT_FOUND: &str = "Unable to find the appropriate key";
pub const DESC_ALGORITHM_NOT_ALLOWED: &str = "Token signing algorithm is not allowed";
pub const DESC_TOKEN_EXPIRED: &str = "Token expired";
pub const DESC_INCORRECT_CLAIMS: &str = "incorrect claims, please check the audience and issuer";
pub const DESC_PERMISSIONS_MISSING: &str = "Permissions not included in JWT";
pub const DESC_PERMISSION_NOT_FOUND: &str = "Permission not found";
pub const DESC_KEY_SET_UNAVAILABLE: &str = "Unable to verify token at this time";

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::Unauthorized => "unauthorized",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => DESC_HEADER_MISSING,
            AuthError::InvalidHeader(desc) => desc,
            AuthError::TokenExpired => DESC_TOKEN_EXPIRED,
            AuthError::InvalidClaims => DESC_INCORRECT_CLAIMS,
            AuthError::PermissionsMissing => DESC_PERMISSIONS_MISSING,
            AuthError::Unauthorized => DESC_PERMISSION_NOT_FOUND,
            // The upstream failure detail stays in the logs.
            AuthError::KeySetUnavailable(_) => DESC_KEY_SET_UNAVAILABLE,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::InvalidHeader(_)
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// True for identity-provider outages, false for client token defects.
    pub fn is_operational(&self) -> bool {
        matches!(self, AuthError::KeySetUnavailable(_))
    }
}

#[derive(Debug, Serialize)]
struct AuthErrorBody {
    code: &'static str,
    description: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = AuthErrorBody {
            code: self.code(),
            description: self.description(),
        };

        (self.status(), Json(body)).into_response()
    }
}
