//! Root operations of the API.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::ApiError;
use super::schema::{PROTECTED_OPERATIONS, Schema, SchemaBuilder};
use crate::auth::{Authenticator, Invocation};
use crate::session::SessionIssuer;

pub type Sessions = Arc<SessionIssuer>;

/// Build the registry with every operation, gating the protected ones.
pub fn build_schema(authenticator: Arc<Authenticator>) -> Schema<Sessions, ApiError> {
    SchemaBuilder::new()
        .operation("healthCheck", health_check)
        .operation("register", register)
        .operation("login", login)
        .operation("createAccessToken", create_access_token)
        .operation("me", me)
        .protect(PROTECTED_OPERATIONS)
        .build(authenticator)
}

/// Missing arguments deserialize as empty strings so validation reports them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RegisterArgs {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginArgs {
    email: String,
    password: String,
}

fn parse_variables<T: DeserializeOwned + Default>(variables: Value) -> Result<T, ApiError> {
    if variables.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(variables)
        .map_err(|e| ApiError::bad_user_input(format!("Invalid variables: {}", e)))
}

async fn health_check(_sessions: Sessions, _invocation: Invocation) -> Result<Value, ApiError> {
    Ok(json!("Server is up and running!"))
}

async fn register(sessions: Sessions, invocation: Invocation) -> Result<Value, ApiError> {
    let args: RegisterArgs = parse_variables(invocation.variables)?;
    let user = sessions
        .register(&args.email, &args.username, &args.password)
        .await?;
    Ok(json!(user))
}

async fn login(sessions: Sessions, invocation: Invocation) -> Result<Value, ApiError> {
    let args: LoginArgs = parse_variables(invocation.variables)?;
    let tokens = sessions.login(&args.email, &args.password).await?;
    Ok(json!(tokens))
}

async fn create_access_token(
    sessions: Sessions,
    invocation: Invocation,
) -> Result<Value, ApiError> {
    let Some(principal) = invocation.context.principal() else {
        return Err(ApiError::internal(
            "createAccessToken",
            "resolver ran without a principal",
        ));
    };
    let access_token = sessions.refresh_access_token(principal).await?;
    Ok(json!({ "accessToken": access_token }))
}

async fn me(_sessions: Sessions, invocation: Invocation) -> Result<Value, ApiError> {
    let Some(principal) = invocation.context.principal() else {
        return Err(ApiError::internal("me", "resolver ran without a principal"));
    };
    Ok(json!(principal.user))
}
