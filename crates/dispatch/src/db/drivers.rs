//! Driver repository for database operations.

use sqlx::SqlitePool;

use taxi_dispatch_core::DriverId;

use super::{DeleteOutcome, RepositoryError, delete_referenced_row};
use crate::config::DeletePolicy;
use crate::models::{Driver, NewDriver};

/// Repository for driver database operations.
pub struct DriverRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DriverRepository<'a> {
    /// Create a new driver repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new driver.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, driver: &NewDriver) -> Result<Driver, RepositoryError> {
        let row = sqlx::query_as::<_, Driver>(
            r"
            INSERT INTO drivers (name, car)
            VALUES (?, ?)
            RETURNING id, name, car
            ",
        )
        .bind(&driver.name)
        .bind(&driver.car)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Get every driver with the given ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: DriverId) -> Result<Vec<Driver>, RepositoryError> {
        let rows = sqlx::query_as::<_, Driver>("SELECT id, name, car FROM drivers WHERE id = ?")
            .bind(id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Delete a driver. Deleting an unknown ID is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(
        &self,
        id: DriverId,
        policy: DeletePolicy,
    ) -> Result<DeleteOutcome, RepositoryError> {
        delete_referenced_row(self.pool, "drivers", "driver_id", id.as_i64(), policy).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use taxi_dispatch_core::{Address, CarDescription, ClientId, PersonName};

    use super::*;
    use crate::db::OrderRepository;
    use crate::db::test_support::memory_pool;
    use crate::models::{Assignment, NewOrder};

    fn new_driver(name: &str, car: &str) -> NewDriver {
        NewDriver {
            name: PersonName::parse(name).unwrap(),
            car: CarDescription::parse(car).unwrap(),
        }
    }

    async fn assign_order_to(pool: &SqlitePool, driver_id: DriverId) {
        let orders = OrderRepository::new(pool);
        let order = orders
            .create(
                &NewOrder {
                    address_from: Address::parse("A").unwrap(),
                    address_to: Address::parse("B").unwrap(),
                },
                Utc::now(),
            )
            .await
            .unwrap();
        orders
            .assign(
                order.id,
                Assignment {
                    client_id: ClientId::new(1),
                    driver_id,
                },
                Utc::now(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = memory_pool().await;
        let repo = DriverRepository::new(&pool);

        let driver = repo.create(&new_driver("Ivan", "Lada Vesta")).await.unwrap();
        let found = repo.find_by_id(driver.id).await.unwrap();

        assert_eq!(found, vec![driver]);
    }

    #[tokio::test]
    async fn test_preserve_policy_leaves_dangling_reference() {
        let pool = memory_pool().await;
        let repo = DriverRepository::new(&pool);
        let driver = repo.create(&new_driver("Ivan", "Lada Vesta")).await.unwrap();
        assign_order_to(&pool, driver.id).await;

        let outcome = repo.delete(driver.id, DeletePolicy::Preserve).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted { rows_affected: 1 });
        let dangling: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE driver_id = ?")
            .bind(driver.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(dangling, 1);
    }

    #[tokio::test]
    async fn test_reject_policy_keeps_referenced_driver() {
        let pool = memory_pool().await;
        let repo = DriverRepository::new(&pool);
        let driver = repo.create(&new_driver("Ivan", "Lada Vesta")).await.unwrap();
        assign_order_to(&pool, driver.id).await;

        let outcome = repo.delete(driver.id, DeletePolicy::Reject).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Referenced);
        assert_eq!(repo.find_by_id(driver.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reject_policy_deletes_unreferenced_driver() {
        let pool = memory_pool().await;
        let repo = DriverRepository::new(&pool);
        let driver = repo.create(&new_driver("Pyotr", "Kia Rio")).await.unwrap();

        let outcome = repo.delete(driver.id, DeletePolicy::Reject).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted { rows_affected: 1 });
    }
}
