//! Database operations for the dispatch `SQLite` store.
//!
//! # Database: single local file (default `taxi.db`)
//!
//! ## Tables
//!
//! - `clients` - Passengers
//! - `drivers` - Drivers and their cars
//! - `orders` - Ride requests, referencing clients and drivers by id
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dispatch/migrations/`, embedded into the
//! binary, and applied at startup by [`migrate`]. The database file is
//! created if it does not exist.
//!
//! # Units of work
//!
//! Single-statement writes run directly on the pool and autocommit. Anything
//! that reads and then writes opens a transaction with `pool.begin()`; the
//! transaction rolls back and returns its connection when dropped, so every
//! early return releases it.

pub mod clients;
pub mod drivers;
pub mod orders;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::config::DeletePolicy;

pub use clients::ClientRepository;
pub use drivers::DriverRepository;
pub use orders::{OrderRepository, TransitionOutcome};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying embedded migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result of deleting a client or driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The statement ran; zero rows means the id did not exist.
    Deleted {
        /// Number of rows removed.
        rows_affected: u64,
    },
    /// Refused because orders still reference the row
    /// (only under [`DeletePolicy::Reject`]).
    Referenced,
}

/// Create a `SQLite` connection pool, creating the database file if missing.
///
/// In-memory URLs (`sqlite::memory:`) get a single connection that is never
/// recycled, since every new connection would see an empty database.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string, e.g. `sqlite://taxi.db`
/// * `max_connections` - Pool size for file-backed databases
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the file cannot be opened.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    pool_options
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply embedded migrations.
///
/// # Errors
///
/// Returns `RepositoryError::Migration` if a migration fails or the
/// recorded migration history does not match the embedded set.
pub async fn migrate(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Delete a row from a table referenced by `orders.<fk_column>`.
///
/// Under [`DeletePolicy::Reject`] the reference check is part of the DELETE
/// statement itself, so a concurrent order assignment cannot slip in between.
async fn delete_referenced_row(
    pool: &SqlitePool,
    table: &'static str,
    fk_column: &'static str,
    id: i64,
    policy: DeletePolicy,
) -> Result<DeleteOutcome, RepositoryError> {
    match policy {
        DeletePolicy::Preserve => {
            let sql = format!("DELETE FROM {table} WHERE id = ?");
            let result = sqlx::query(&sql).bind(id).execute(pool).await?;
            Ok(DeleteOutcome::Deleted {
                rows_affected: result.rows_affected(),
            })
        }
        DeletePolicy::Reject => {
            let mut tx = pool.begin().await?;

            let sql = format!(
                "DELETE FROM {table} WHERE id = ?1 \
                 AND NOT EXISTS (SELECT 1 FROM orders WHERE {fk_column} = ?1)"
            );
            let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
            if result.rows_affected() > 0 {
                tx.commit().await?;
                return Ok(DeleteOutcome::Deleted {
                    rows_affected: result.rows_affected(),
                });
            }

            let sql = format!("SELECT COUNT(*) FROM {table} WHERE id = ?");
            let existing: i64 = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

            if existing > 0 {
                Ok(DeleteOutcome::Referenced)
            } else {
                Ok(DeleteOutcome::Deleted { rows_affected: 0 })
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://taxi.db"));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = test_support::memory_pool().await;
        assert!(migrate(&pool).await.is_ok());

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name IN ('clients', 'drivers', 'orders') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap_or_default();
        assert_eq!(tables, ["clients", "drivers", "orders"]);
    }
}
