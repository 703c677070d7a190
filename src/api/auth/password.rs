//! Password hashing and verification.
//!
//! bcrypt runs on the blocking thread pool to keep it off the async runtime.

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a password with a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails or the blocking task panics.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .context("Hashing task failed")?
        .context("Failed to hash password")
}

/// Verify a password against a stored bcrypt hash.
///
/// # Errors
/// Returns an error if the hash is malformed or the blocking task panics.
pub async fn verify_password(password: &str, hashed: &str) -> Result<bool> {
    let password = password.to_string();
    let hashed = hashed.to_string();

    tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .context("Verification task failed")?
        .context("Failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hashed = hash_password("secret1").await.unwrap();

        assert!(verify_password("secret1", &hashed).await.unwrap());
        assert!(!verify_password("wrong", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_fresh_salt_per_hash() {
        let first = hash_password("secret1").await.unwrap();
        let second = hash_password("secret1").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        assert!(verify_password("secret1", "not-a-hash").await.is_err());
    }
}
