//! Refresh token storage.
//!
//! Every login persists one row. Rows are never deduplicated or rotated; they are
//! only removed by the expiry cleanup (see `cleanup.rs`) or when the user is deleted.
//! Access tokens are stateless and never stored.

use sqlx::sqlite::SqlitePool;

/// A persisted refresh token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: i64,
    pub refresh_token: String,
    /// Unix seconds, copied from the token's `exp` claim
    pub expires_at: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Store for managing refresh tokens.
pub struct RefreshTokenStore {
    pool: SqlitePool,
}

impl RefreshTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a newly issued refresh token.
    pub async fn save(
        &self,
        user_id: i64,
        refresh_token: &str,
        expires_at: u64,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_tokens (user_id, refresh_token, expires_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(refresh_token)
        .bind(expires_at as i64)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Find the record matching both the user and the exact token string.
    pub async fn find(
        &self,
        user_id: i64,
        refresh_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, user_id, refresh_token, expires_at, created_at, updated_at
             FROM user_tokens WHERE user_id = ? AND refresh_token = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(refresh_token)
        .fetch_optional(&self.pool)
        .await
    }

    /// List all refresh tokens for a user, newest first.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<RefreshTokenRecord>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, user_id, refresh_token, expires_at, created_at, updated_at
             FROM user_tokens WHERE user_id = ? ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Delete every token whose expiry is at or before `now` (Unix seconds).
    pub async fn delete_expired(&self, now: u64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE expires_at <= ?")
            .bind(now as i64)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    async fn db_with_user() -> (Database, i64) {
        let db = Database::open(":memory:").await.unwrap();
        let user = db.users().create("a@x.com", "alice", "hash").await.unwrap();
        (db, user.id)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let (db, user_id) = db_with_user().await;

        let id = db.tokens().save(user_id, "tok-1", 2_000).await.unwrap();

        let record = db.tokens().find(user_id, "tok-1").await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.refresh_token, "tok-1");
        assert_eq!(record.expires_at, 2_000);
    }

    #[tokio::test]
    async fn test_find_requires_exact_match() {
        let (db, user_id) = db_with_user().await;
        db.tokens().save(user_id, "tok-1", 2_000).await.unwrap();

        assert!(db.tokens().find(user_id, "tok-2").await.unwrap().is_none());
        assert!(db.tokens().find(user_id + 1, "tok-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_multiple_tokens_per_user_are_kept() {
        let (db, user_id) = db_with_user().await;
        db.tokens().save(user_id, "tok-1", 2_000).await.unwrap();
        db.tokens().save(user_id, "tok-2", 2_000).await.unwrap();

        let tokens = db.tokens().list_by_user(user_id).await.unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].refresh_token, "tok-2");
        assert!(db.tokens().find(user_id, "tok-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let (db, user_id) = db_with_user().await;
        db.tokens().save(user_id, "old", 1_000).await.unwrap();
        db.tokens().save(user_id, "live", 3_000).await.unwrap();

        let deleted = db.tokens().delete_expired(1_000).await.unwrap();
        assert_eq!(deleted, 1);

        assert!(db.tokens().find(user_id, "old").await.unwrap().is_none());
        assert!(db.tokens().find(user_id, "live").await.unwrap().is_some());
    }
}
