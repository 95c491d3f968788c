//! JWT token generation and validation.
//!
//! Access and refresh tokens share one encoding: an HS256 JWT carrying the
//! user payload under `user`, plus `jti`, `iat` and `exp`. They differ only
//! in the lifetime the caller asks for.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Default access token lifetime in hours.
pub const DEFAULT_ACCESS_TOKEN_HOURS: u64 = 24;

/// Default refresh token lifetime in hours (30 days).
pub const DEFAULT_REFRESH_TOKEN_HOURS: u64 = 720;

const SECS_PER_HOUR: u64 = 60 * 60;

/// JWT claims wrapping an arbitrary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims<P> {
    /// Embedded payload (a user without its password hash)
    pub user: P,
    /// JWT ID, unique per issued token
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Result of issuing a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: u64,
}

/// Signs and verifies bearer tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Create a codec for the given secret. An empty secret is a configuration fault.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".into()));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Sign `payload` with an expiry `lifetime_hours` from now.
    pub fn issue<P: Serialize>(
        &self,
        payload: &P,
        lifetime_hours: u64,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(payload, lifetime_hours, now_secs()?)
    }

    /// Sign `payload` as if the current time were `now`.
    pub fn issue_at<P: Serialize>(
        &self,
        payload: &P,
        lifetime_hours: u64,
        now: u64,
    ) -> Result<IssuedToken, TokenError> {
        if lifetime_hours == 0 {
            return Err(TokenError::Signing("token lifetime must be positive".into()));
        }

        let exp = lifetime_hours
            .checked_mul(SECS_PER_HOUR)
            .and_then(|secs| now.checked_add(secs))
            .ok_or_else(|| TokenError::Signing("token lifetime is out of range".into()))?;

        let claims = Claims {
            user: payload,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    /// Verify a token and return its payload.
    pub fn verify<P: DeserializeOwned>(&self, token: &str) -> Result<P, TokenError> {
        self.verify_at(token, now_secs()?)
    }

    /// Verify a token against the given clock. The token is valid strictly before `exp`.
    pub fn verify_at<P: DeserializeOwned>(&self, token: &str, now: u64) -> Result<P, TokenError> {
        self.decode_at(token, now).map(|claims| claims.user)
    }

    /// Verify a token and return the full claim set.
    pub fn decode_at<P: DeserializeOwned>(
        &self,
        token: &str,
        now: u64,
    ) -> Result<Claims<P>, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;

        let token_data = jsonwebtoken::decode::<Claims<P>>(token, &self.decoding_key, &validation)
            .map_err(TokenError::Invalid)?;

        if now >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

/// Current Unix time in seconds.
pub fn now_secs() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Time)
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to decode token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("Token has expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("System time error")]
    Time,
}
