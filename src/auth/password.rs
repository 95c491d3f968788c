//! Password hashing.
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool and are awaited.

use tokio::task::JoinError;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] JoinError),
}

/// Hash a password with a fresh salt.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Check a password against a stored hash.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("longpassword1", TEST_COST).await.unwrap();

        assert_ne!(hash, "longpassword1");
        assert!(verify_password("longpassword1", &hash).await.unwrap());
        assert!(!verify_password("wrongpassword", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let first = hash_password("longpassword1", TEST_COST).await.unwrap();
        let second = hash_password("longpassword1", TEST_COST).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        assert!(verify_password("longpassword1", "not-a-hash").await.is_err());
    }

    #[tokio::test]
    async fn test_default_cost_is_encoded() {
        let hash = hash_password("longpassword1", DEFAULT_BCRYPT_COST)
            .await
            .unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }
}
