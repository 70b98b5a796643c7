//! Subcommand implementations.

pub mod migrate;
pub mod order;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;

use taxi_dispatch::config::{ConfigError, DispatchConfig};
use taxi_dispatch::db::{self, RepositoryError};
use taxi_dispatch::services::DispatchError;
use taxi_dispatch_core::TextError;

/// Errors a CLI command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("invalid seed data: {0}")]
    SeedData(#[from] TextError),
}

/// Load configuration and open the configured database.
///
/// Migrations are applied so every command sees the current schema.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or the database cannot
/// be opened or migrated.
pub async fn connect() -> Result<(DispatchConfig, SqlitePool), CommandError> {
    let config = DispatchConfig::from_env()?;

    tracing::info!(database_url = %config.database_url, "Connecting to database");
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    db::migrate(&pool).await?;

    Ok((config, pool))
}
