use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use thiserror::Error;

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

/// A stored user, including the password hash.
///
/// Deliberately not `Serialize`: convert with [`User::without_password`] before
/// handing a user to anything outside the credential store.
#[derive(Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Strip the password hash.
    pub fn without_password(self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email,
            username: self.username,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// A user without the password hash. This is also the token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password: String,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Errors from user creation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user. Fails with `DuplicateEmail` if the email is taken.
    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (email, username, password) VALUES (?, ?, ?)
             RETURNING id, email, username, password, created_at, updated_at",
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateEmail
            }
            other => StoreError::Database(other),
        })?;
        Ok(User::from(row))
    }

    /// Get a user by email, including the password hash. Used only for login.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, username, password, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Get a user by email without ever selecting the password hash.
    pub async fn find_by_email_public(
        &self,
        email: &str,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, email, username, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }
}
