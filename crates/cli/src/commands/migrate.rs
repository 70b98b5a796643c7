//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! taxi-cli migrate
//! ```
//!
//! Creates the database file if needed and applies the migrations in
//! `crates/dispatch/migrations/`. The web binary does the same at startup;
//! this command exists for provisioning without starting the server.

use super::CommandError;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let (_config, pool) = super::connect().await?;
    pool.close().await;

    tracing::info!("Migrations complete");
    Ok(())
}
