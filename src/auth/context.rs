//! Request-scoped authentication state.

use axum::http::HeaderMap;
use serde_json::Value;

use crate::db::PublicUser;

/// The authenticated identity for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Payload decoded from the bearer token
    pub user: PublicUser,
    /// The exact token string that was presented
    pub token: String,
}

/// Authentication state of the request being executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Context {
    #[default]
    Unauthenticated,
    Authenticated(Principal),
}

impl Context {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Context::Authenticated(principal) => Some(principal),
            Context::Unauthenticated => None,
        }
    }
}

/// One call of a named operation.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Inbound request headers
    pub headers: HeaderMap,
    /// Starts `Unauthenticated`; the access gate replaces it
    pub context: Context,
    /// Operation arguments as sent by the client
    pub variables: Value,
}

impl Invocation {
    pub fn new(headers: HeaderMap, variables: Value) -> Self {
        Self {
            headers,
            context: Context::Unauthenticated,
            variables,
        }
    }
}
