mod error;
mod operations;
mod schema;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{Authenticator, Invocation};
use crate::session::SessionIssuer;

pub use error::ApiError;
pub use operations::{Sessions, build_schema};
pub use schema::{PROTECTED_OPERATIONS, Schema, SchemaBuilder};

#[derive(Clone)]
pub struct ApiState {
    pub schema: Arc<Schema<Sessions, ApiError>>,
    pub sessions: Sessions,
}

/// Body of an operation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub operation_name: String,
    #[serde(default)]
    pub variables: Value,
}

/// Create the API router.
pub fn create_api_router(sessions: Arc<SessionIssuer>, authenticator: Arc<Authenticator>) -> Router {
    let state = ApiState {
        schema: Arc::new(build_schema(authenticator)),
        sessions,
    };

    Router::new()
        .route("/graphql", post(execute_operation))
        .with_state(state)
}

async fn execute_operation(
    State(state): State<ApiState>,
    headers: HeaderMap,
    request: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request.map_err(|rejection| {
        debug!(error = %rejection, "Rejected operation request body");
        ApiError::bad_user_input(rejection.body_text())
    })?;
    let name = request.operation_name;
    let invocation = Invocation::new(headers, request.variables);

    let Some(result) = state
        .schema
        .execute(&name, state.sessions.clone(), invocation)
        .await
    else {
        debug!(operation = %name, "Unknown operation");
        return Err(ApiError::bad_user_input(format!(
            "Unknown operation: {}",
            name
        )));
    };

    let mut data = Map::new();
    data.insert(name, result?);
    Ok(Json(json!({ "data": data })).into_response())
}
