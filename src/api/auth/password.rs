//! bcrypt password hashing.
//!
//! Hashing and verification are CPU bound, so both run on the blocking
//! thread pool.

use bcrypt::{hash, verify};

use crate::api::error::MarketError;

/// Cost used when none is configured
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Lowest cost bcrypt accepts; only suitable for tests and demos
pub const MIN_COST: u32 = 4;

/// Hash `password` with the given bcrypt cost. The salt is embedded in the
/// returned string.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, MarketError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| MarketError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| MarketError::PasswordHash(format!("Task join error: {}", e)))?
}

/// Check `password` against a bcrypt hash.
///
/// A stored value that is not a bcrypt hash is an error, not a mismatch.
pub async fn verify_password(password: &str, stored: &str) -> Result<bool, MarketError> {
    let password = password.to_string();
    let stored = stored.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &stored).map_err(|e| MarketError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| MarketError::PasswordHash(format!("Task join error: {}", e)))?
}
