//! Client repository for database operations.

use sqlx::SqlitePool;

use taxi_dispatch_core::ClientId;

use super::{DeleteOutcome, RepositoryError, delete_referenced_row};
use crate::config::DeletePolicy;
use crate::models::{Client, NewClient};

/// Repository for client database operations.
pub struct ClientRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ClientRepository<'a> {
    /// Create a new client repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new client.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, client: &NewClient) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, Client>(
            r"
            INSERT INTO clients (name, is_vip)
            VALUES (?, ?)
            RETURNING id, name, is_vip
            ",
        )
        .bind(&client.name)
        .bind(client.is_vip)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Get every client with the given ID.
    ///
    /// IDs are unique, so this yields at most one row in practice.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ClientId) -> Result<Vec<Client>, RepositoryError> {
        let rows = sqlx::query_as::<_, Client>(
            r"
            SELECT id, name, is_vip
            FROM clients
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete a client.
    ///
    /// Deleting an unknown ID is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(
        &self,
        id: ClientId,
        policy: DeletePolicy,
    ) -> Result<DeleteOutcome, RepositoryError> {
        delete_referenced_row(self.pool, "clients", "client_id", id.as_i64(), policy).await
    }
}
