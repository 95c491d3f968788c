pub mod api;
pub mod auth;
pub mod cleanup;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod session;
pub mod validation;

use api::create_api_router;
use auth::Authenticator;
use axum::Router;
use db::Database;
use jwt::{TokenCodec, TokenError};
use session::{SessionIssuer, SessionSettings};
use std::sync::Arc;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Token lifetimes and bcrypt cost
    pub session: SessionSettings,
}

/// Create the application router with the given configuration.
/// Fails if the JWT secret cannot be used for signing.
pub fn create_app(config: &ServerConfig) -> Result<Router, TokenError> {
    let codec = Arc::new(TokenCodec::new(&config.jwt_secret)?);
    let authenticator = Arc::new(Authenticator::new(codec.clone()));
    let sessions = Arc::new(SessionIssuer::new(
        config.db.clone(),
        codec,
        config.session,
    ));

    Ok(create_api_router(sessions, authenticator))
}

/// Run cleanup tasks and spawn background scheduler.
/// Call this before serving requests.
pub async fn init_cleanup(db: &Database) {
    cleanup::run_cleanup(db).await;
    cleanup::spawn_cleanup_scheduler(db.clone());
}
