//! Operation registry.
//!
//! Each root operation is a named [`Resolver`]. Names listed with
//! [`SchemaBuilder::protect`] are wrapped with [`require_auth`] when the schema is built,
//! so the gate is decided per operation and never for the whole endpoint.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::warn;

use crate::auth::{AuthError, Authenticator, Invocation, Resolver, require_auth};

/// Operations that require a verified bearer token.
pub const PROTECTED_OPERATIONS: &[&str] = &["createAccessToken", "me"];

/// Collects resolvers and the names that must be gated.
pub struct SchemaBuilder<S, E> {
    operations: HashMap<&'static str, Resolver<S, E>>,
    protected: Vec<&'static str>,
}

impl<S, E> Default for SchemaBuilder<S, E> {
    fn default() -> Self {
        Self {
            operations: HashMap::new(),
            protected: Vec::new(),
        }
    }
}

impl<S, E> SchemaBuilder<S, E>
where
    S: Send + 'static,
    E: From<AuthError> + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver. A later registration under the same name replaces the earlier.
    pub fn operation<F, Fut>(mut self, name: &'static str, resolver: F) -> Self
    where
        F: Fn(S, Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
    {
        let boxed: Resolver<S, E> = Arc::new(move |state: S, invocation: Invocation| {
            resolver(state, invocation).boxed()
        });
        self.operations.insert(name, boxed);
        self
    }

    /// Mark operations as requiring authentication.
    pub fn protect(mut self, names: &[&'static str]) -> Self {
        self.protected.extend_from_slice(names);
        self
    }

    /// Install the access gate on every protected operation.
    pub fn build(self, authenticator: Arc<Authenticator>) -> Schema<S, E> {
        let mut operations = self.operations;

        for name in self.protected {
            match operations.remove(name) {
                Some(resolver) => {
                    operations.insert(name, require_auth(authenticator.clone(), resolver));
                }
                None => warn!(operation = name, "Protected operation is not registered"),
            }
        }

        Schema { operations }
    }
}

/// Built registry, shared by all requests.
pub struct Schema<S, E> {
    operations: HashMap<&'static str, Resolver<S, E>>,
}

impl<S, E> Schema<S, E> {
    /// Run the named operation, or `None` if no such operation exists.
    pub async fn execute(
        &self,
        name: &str,
        state: S,
        invocation: Invocation,
    ) -> Option<Result<Value, E>> {
        let resolver = self.operations.get(name)?.clone();
        Some(resolver(state, invocation).await)
    }
}
