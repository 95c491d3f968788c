//! Shared error handling for API operations.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::auth::AuthError;
use crate::session::SessionError;

/// API error type with automatic response conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or rejected credentials, with a machine-readable reason
    Unauthenticated {
        message: String,
        reason: &'static str,
    },
    Forbidden(String),
    BadUserInput(String),
    Conflict(String),
    Internal,
}

impl ApiError {
    pub fn bad_user_input(msg: impl Into<String>) -> Self {
        Self::BadUserInput(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(context: &str, e: impl std::fmt::Display) -> Self {
        error!("{}: {}", context, e);
        Self::Internal
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadUserInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated { .. } => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::BadUserInput(_) => "BAD_USER_INPUT",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated { message, .. } => message.as_str(),
            ApiError::Forbidden(msg) | ApiError::BadUserInput(msg) | ApiError::Conflict(msg) => {
                msg.as_str()
            }
            ApiError::Internal => "Internal server error",
        }
    }

    fn reason(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthenticated { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthenticated {
            message: err.to_string(),
            reason: err.reason(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(msg) => ApiError::BadUserInput(msg),
            SessionError::InvalidCredentials => ApiError::Unauthenticated {
                message: err.to_string(),
                reason: "INVALID_CREDENTIALS",
            },
            SessionError::EmailAlreadyExists => ApiError::conflict(err.to_string()),
            SessionError::NotAuthorized => ApiError::forbidden(err.to_string()),
            SessionError::Signing(e) => ApiError::internal("Failed to sign token", e),
            SessionError::Password(e) => ApiError::internal("Password hashing failed", e),
            SessionError::Storage(e) => ApiError::internal("Database error", e),
        }
    }
}

#[derive(Serialize)]
struct ErrorExtensions {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorEntry<'a> {
    message: &'a str,
    extensions: ErrorExtensions,
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    errors: [ErrorEntry<'a>; 1],
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            errors: [ErrorEntry {
                message: self.message(),
                extensions: ErrorExtensions {
                    code: self.code(),
                    reason: self.reason(),
                },
            }],
        };
        (self.status(), Json(body)).into_response()
    }
}
