//! Database operations for the Pantry `PostgreSQL` store.
//!
//! ## Tables (schema `pantry`)
//!
//! - `account` - Credentials; inserting one creates its `profile` by trigger
//! - `profile` - Display name and the one-way onboarding flag
//! - `ingredient` / `utensil` - Inventory, unique per `(user_id, name)`
//! - `user_preferences` - One row per user
//! - `recipe` - Saved recipes with a JSONB ingredient snapshot
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! Cooking runs inside the `pantry.cook_recipe` function, never as
//! read-then-write from here.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p pantry-cli -- migrate
//! ```

mod accounts;
mod cooking;
mod inventory;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod preferences;
mod recipes;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use pantry_core::store::{PantryStore, StoreError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Errors raised by the `PostgreSQL` repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique violation to [`RepositoryError::Conflict`] naming `key`.
    pub(crate) fn conflict_on_unique(key: impl Into<String>) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| {
            if let sqlx::Error::Database(ref db_err) = err
                && db_err.is_unique_violation()
            {
                return Self::Conflict(key.into());
            }
            Self::Database(err)
        }
    }
}

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(err) => classify(err),
            RepositoryError::DataCorruption(message) => Self::DataCorruption(message),
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(key) => Self::Duplicate(key),
        }
    }
}

/// Serialization failures and deadlocks are safe to retry.
const RETRYABLE_SQLSTATES: &[&str] = &["40001", "40P01"];

fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(db_err.constraint().unwrap_or("record").to_owned())
        }
        sqlx::Error::Database(db_err)
            if db_err.code().is_some_and(|code| {
                RETRYABLE_SQLSTATES
                    .iter()
                    .any(|retryable| code == *retryable)
            }) =>
        {
            StoreError::Unavailable(err.to_string())
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::DataCorruption(err.to_string())
        }
        _ => StoreError::Internal(err.to_string()),
    }
}

/// `PostgreSQL` implementation of every storage port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PantryStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(RepositoryError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_transient() {
        assert!(StoreError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut)).is_transient());
    }

    #[test]
    fn test_missing_rows_map_to_not_found() {
        assert_eq!(
            StoreError::from(RepositoryError::Database(sqlx::Error::RowNotFound)),
            StoreError::NotFound
        );
    }

    #[test]
    fn test_conflict_maps_to_duplicate() {
        assert_eq!(
            StoreError::from(RepositoryError::Conflict("ingredient Flour".to_owned())),
            StoreError::Duplicate("ingredient Flour".to_owned())
        );
    }
}
