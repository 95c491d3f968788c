//! Access gate for protected operations.
//!
//! A resolver is a shared async function from `(state, invocation)` to a JSON value.
//! [`require_auth`] wraps one so that its body only runs after the invocation's
//! bearer token has been verified.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::authenticator::Authenticator;
use super::context::{Context, Invocation};
use super::errors::AuthError;

/// Type-erased operation resolver.
pub type Resolver<S, E> =
    Arc<dyn Fn(S, Invocation) -> BoxFuture<'static, Result<Value, E>> + Send + Sync>;

/// Wrap `resolver` so it refuses to run for unauthenticated invocations.
///
/// On success the wrapped resolver sees `Context::Authenticated`; on failure it is
/// never polled and the authentication error is returned as-is.
pub fn require_auth<S, E>(
    authenticator: Arc<Authenticator>,
    resolver: Resolver<S, E>,
) -> Resolver<S, E>
where
    S: Send + 'static,
    E: From<AuthError> + Send + 'static,
{
    Arc::new(move |state: S, mut invocation: Invocation| {
        let authenticator = authenticator.clone();
        let resolver = resolver.clone();
        async move {
            let principal = authenticator.authenticate(&invocation.headers)?;
            invocation.context = Context::Authenticated(principal);
            resolver(state, invocation).await
        }
        .boxed()
    })
}
