//! Bearer-token authentication.
//!
//! Requests carry `Authorization: Bearer <jwt>`. The [`Authenticator`] verifies the
//! token and yields a [`Principal`]; [`require_auth`] wraps the resolvers of protected
//! operations so they only run once that has succeeded.

mod authenticator;
mod bearer;
mod context;
mod errors;
mod gate;
mod password;

pub use authenticator::Authenticator;
pub use bearer::bearer_token;
pub use context::{Context, Invocation, Principal};
pub use errors::AuthError;
pub use gate::{Resolver, require_auth};
pub use password::{DEFAULT_BCRYPT_COST, PasswordError, hash_password, verify_password};
