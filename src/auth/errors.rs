//! Authentication error types.

use thiserror::Error;

use crate::jwt::TokenError;

/// Why a request could not be authenticated. Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header must be provided")]
    AuthorizationHeaderMissing,

    #[error("Authentication token must be provided")]
    TokenMissing,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token has expired")]
    TokenExpired,
}

impl AuthError {
    /// Stable machine-readable reason, surfaced next to the message.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "AUTHORIZATION_HEADER_MISSING",
            AuthError::TokenMissing => "TOKEN_MISSING",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    }
}
