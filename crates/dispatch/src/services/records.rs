//! Record service: clients, drivers, and order lookups.

use sqlx::SqlitePool;
use tracing::instrument;

use taxi_dispatch_core::{ClientId, DriverId, OrderId};

use super::DispatchError;
use super::forms::{ClientForm, DriverForm};
use crate::config::DeletePolicy;
use crate::db::{ClientRepository, DeleteOutcome, DriverRepository, OrderRepository};
use crate::models::{Client, Driver, NewClient, NewDriver, Order};

/// Create, look up, and delete stored records.
pub struct RecordService<'a> {
    pool: &'a SqlitePool,
    delete_policy: DeletePolicy,
}

impl<'a> RecordService<'a> {
    /// Create a record service; `delete_policy` governs referenced deletes.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, delete_policy: DeletePolicy) -> Self {
        Self {
            pool,
            delete_policy,
        }
    }

    /// Validate form input and create a client.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` for bad input (nothing is stored)
    /// or `DispatchError::Storage` if the insert fails.
    pub async fn create_client(&self, form: &ClientForm) -> Result<Client, DispatchError> {
        let client = form.validate()?;
        self.insert_client(&client).await
    }

    /// Create a client from already-validated input.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Storage` if the insert fails.
    #[instrument(skip(self, client), fields(client.name = %client.name))]
    pub async fn insert_client(&self, client: &NewClient) -> Result<Client, DispatchError> {
        let created = ClientRepository::new(self.pool).create(client).await?;
        tracing::info!(client_id = %created.id, is_vip = created.is_vip, "Client created");
        Ok(created)
    }

    /// Validate form input and create a driver.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` for bad input (nothing is stored)
    /// or `DispatchError::Storage` if the insert fails.
    pub async fn create_driver(&self, form: &DriverForm) -> Result<Driver, DispatchError> {
        let driver = form.validate()?;
        self.insert_driver(&driver).await
    }

    /// Create a driver from already-validated input.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Storage` if the insert fails.
    #[instrument(skip(self, driver), fields(driver.name = %driver.name))]
    pub async fn insert_driver(&self, driver: &NewDriver) -> Result<Driver, DispatchError> {
        let created = DriverRepository::new(self.pool).create(driver).await?;
        tracing::info!(driver_id = %created.id, "Driver created");
        Ok(created)
    }

    /// All clients with this ID.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NotFound` if there are none.
    pub async fn find_clients(&self, id: ClientId) -> Result<Vec<Client>, DispatchError> {
        let rows = ClientRepository::new(self.pool).find_by_id(id).await?;
        non_empty(rows, "client", id.as_i64())
    }

    /// All drivers with this ID.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NotFound` if there are none.
    pub async fn find_drivers(&self, id: DriverId) -> Result<Vec<Driver>, DispatchError> {
        let rows = DriverRepository::new(self.pool).find_by_id(id).await?;
        non_empty(rows, "driver", id.as_i64())
    }

    /// All orders with this ID.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NotFound` if there are none.
    pub async fn find_orders(&self, id: OrderId) -> Result<Vec<Order>, DispatchError> {
        let rows = OrderRepository::new(self.pool).find_by_id(id).await?;
        non_empty(rows, "order", id.as_i64())
    }

    /// Delete a client. Returns the number of rows removed (0 for unknown IDs).
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::BusinessRule` if orders reference the client and
    /// the delete policy is `reject`.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, id: ClientId) -> Result<u64, DispatchError> {
        let outcome = ClientRepository::new(self.pool)
            .delete(id, self.delete_policy)
            .await?;
        deleted_rows(outcome, "client", id.as_i64())
    }

    /// Delete a driver. Returns the number of rows removed (0 for unknown IDs).
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::BusinessRule` if orders reference the driver and
    /// the delete policy is `reject`.
    #[instrument(skip(self))]
    pub async fn delete_driver(&self, id: DriverId) -> Result<u64, DispatchError> {
        let outcome = DriverRepository::new(self.pool)
            .delete(id, self.delete_policy)
            .await?;
        deleted_rows(outcome, "driver", id.as_i64())
    }
}

fn non_empty<T>(rows: Vec<T>, entity: &'static str, id: i64) -> Result<Vec<T>, DispatchError> {
    if rows.is_empty() {
        return Err(DispatchError::not_found(entity, id));
    }
    Ok(rows)
}

fn deleted_rows(outcome: DeleteOutcome, entity: &'static str, id: i64) -> Result<u64, DispatchError> {
    match outcome {
        DeleteOutcome::Deleted { rows_affected } => {
            tracing::info!(entity, id, rows_affected, "Delete executed");
            Ok(rows_affected)
        }
        DeleteOutcome::Referenced => Err(DispatchError::BusinessRule(format!(
            "The {entity} cannot be deleted while orders reference it"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::services::OrderLifecycle;
    use crate::services::forms::{AssignForm, OrderForm};

    fn client_form(name: &str) -> ClientForm {
        ClientForm {
            name: Some(name.into()),
            is_vip: Some("False".into()),
        }
    }

    #[tokio::test]
    async fn test_invalid_client_persists_nothing() {
        let pool = memory_pool().await;
        let records = RecordService::new(&pool, DeletePolicy::Preserve);

        let err = records.create_client(&client_form("")).await.unwrap_err();
        assert_eq!(err.kind(), "validation");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_lookup_missing_is_not_found() {
        let pool = memory_pool().await;
        let records = RecordService::new(&pool, DeletePolicy::Preserve);

        let err = records.find_clients(ClientId::new(1)).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { entity: "client", ref id } if id == "1"));
        let err = records.find_drivers(DriverId::new(2)).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { entity: "driver", ref id } if id == "2"));
        let err = records.find_orders(OrderId::new(3)).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { entity: "order", ref id } if id == "3"));
    }

    #[tokio::test]
    async fn test_create_then_find_client() {
        let pool = memory_pool().await;
        let records = RecordService::new(&pool, DeletePolicy::Preserve);

        let client = records.create_client(&client_form("Anna")).await.unwrap();
        let found = records.find_clients(client.id).await.unwrap();

        assert_eq!(found, vec![client]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let pool = memory_pool().await;
        let records = RecordService::new(&pool, DeletePolicy::Preserve);

        assert_eq!(records.delete_client(ClientId::new(99)).await.unwrap(), 0);
        assert_eq!(records.delete_driver(DriverId::new(99)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reject_policy_surfaces_business_rule() {
        let pool = memory_pool().await;
        let records = RecordService::new(&pool, DeletePolicy::Reject);
        let client = records.create_client(&client_form("Anna")).await.unwrap();

        let lifecycle = OrderLifecycle::new(&pool);
        let order = lifecycle
            .create(&OrderForm {
                address_from: Some("A".into()),
                address_to: Some("B".into()),
            })
            .await
            .unwrap();
        lifecycle
            .assign(
                order.id,
                &AssignForm {
                    client_id: Some(client.id.to_string()),
                    driver_id: Some("1".into()),
                },
            )
            .await
            .unwrap();

        let err = records.delete_client(client.id).await.unwrap_err();
        assert_eq!(err.kind(), "business_rule");
        assert_eq!(records.find_clients(client.id).await.unwrap().len(), 1);
    }
}
