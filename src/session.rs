//! Registration, login and access-token renewal.
//!
//! No session state lives on the server beyond the persisted refresh-token rows.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::{
    DEFAULT_BCRYPT_COST, PasswordError, Principal, hash_password, verify_password,
};
use crate::db::{Database, PublicUser, StoreError};
use crate::jwt::{
    DEFAULT_ACCESS_TOKEN_HOURS, DEFAULT_REFRESH_TOKEN_HOURS, TokenCodec, TokenError, now_secs,
};
use crate::validation::{validate_login, validate_registration};

/// Token lifetimes and hashing cost.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub access_token_hours: u64,
    pub refresh_token_hours: u64,
    pub bcrypt_cost: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            access_token_hours: DEFAULT_ACCESS_TOKEN_HOURS,
            refresh_token_hours: DEFAULT_REFRESH_TOKEN_HOURS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Failures of the session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),

    /// Same message for an unknown email and a wrong password.
    #[error("Wrong User Credentials")]
    InvalidCredentials,

    #[error("This email already exists")]
    EmailAlreadyExists,

    #[error("You are not authorized to perform this operation")]
    NotAuthorized,

    #[error(transparent)]
    Signing(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => SessionError::EmailAlreadyExists,
            StoreError::Database(e) => SessionError::Storage(e),
        }
    }
}

/// Issues credentials against the credential store.
#[derive(Clone)]
pub struct SessionIssuer {
    db: Database,
    codec: Arc<TokenCodec>,
    settings: SessionSettings,
}

impl SessionIssuer {
    pub fn new(db: Database, codec: Arc<TokenCodec>, settings: SessionSettings) -> Self {
        Self {
            db,
            codec,
            settings,
        }
    }

    /// Create an account. The returned user never carries the password hash.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<PublicUser, SessionError> {
        validate_registration(email, username, password).map_err(SessionError::Validation)?;

        if self.db.users().find_by_email_public(email).await?.is_some() {
            return Err(SessionError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password, self.settings.bcrypt_cost).await?;

        let user = self
            .db
            .users()
            .create(email, username, &password_hash)
            .await?
            .without_password();

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and mint an access/refresh token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, SessionError> {
        validate_login(email, password).map_err(SessionError::Validation)?;

        let Some(user) = self.db.users().find_by_email(email).await? else {
            debug!("Login for unknown email");
            return Err(SessionError::InvalidCredentials);
        };

        if !verify_password(password, user.password_hash()).await? {
            debug!(user_id = user.id, "Login with wrong password");
            return Err(SessionError::InvalidCredentials);
        }

        let user = user.without_password();

        let access = self.codec.issue(&user, self.settings.access_token_hours)?;
        let refresh = self.codec.issue(&user, self.settings.refresh_token_hours)?;

        self.db
            .tokens()
            .save(user.id, &refresh.token, refresh.expires_at)
            .await?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginTokens {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    /// Mint a new access token for a principal that presented a stored refresh token.
    ///
    /// The caller must already have passed the access gate, so `principal.token` is a
    /// verified, unexpired token. The refresh token is not rotated.
    pub async fn refresh_access_token(&self, principal: &Principal) -> Result<String, SessionError> {
        let record = self
            .db
            .tokens()
            .find(principal.user.id, &principal.token)
            .await?
            .ok_or(SessionError::NotAuthorized)?;

        if record.expires_at <= now_secs()? as i64 {
            return Err(SessionError::NotAuthorized);
        }

        let access = self
            .codec
            .issue(&principal.user, self.settings.access_token_hours)?;
        Ok(access.token)
    }
}
