//! Bearer token verification.

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::debug;

use super::bearer::bearer_token;
use super::context::Principal;
use super::errors::AuthError;
use crate::db::PublicUser;
use crate::jwt::TokenCodec;

/// Turns an inbound bearer header into a [`Principal`].
#[derive(Clone)]
pub struct Authenticator {
    codec: Arc<TokenCodec>,
}

impl Authenticator {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify the request's bearer token. A failure is final for the request.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = bearer_token(headers).inspect_err(|e| {
            debug!(reason = e.reason(), "Rejected request without usable credentials");
        })?;

        let user = self
            .codec
            .verify::<PublicUser>(token)
            .map_err(AuthError::from)
            .inspect_err(|e| debug!(reason = e.reason(), "Rejected bearer token"))?;

        Ok(Principal {
            user,
            token: token.to_string(),
        })
    }
}
