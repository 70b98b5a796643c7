//! Order repository for database operations.
//!
//! Status transitions are single conditional updates guarded by the
//! statuses [`OrderTransition::allowed_from`] lists. A transition either
//! updates exactly the row it checked or updates nothing.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use taxi_dispatch_core::{ClientId, DriverId, OrderId, OrderStatus, OrderTransition};

use super::RepositoryError;
use crate::models::{Assignment, NewOrder, Order};

const ORDER_COLUMNS: &str =
    "id, address_from, address_to, client_id, driver_id, date_created, status";

/// Result of attempting a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition was applied; the updated order is returned.
    Applied(Order),
    /// The order exists but its status does not permit the transition.
    Rejected(OrderStatus),
    /// No order with this ID.
    Missing,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new order in the `not_accepted` status with no client or driver.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        order: &NewOrder,
        now: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "INSERT INTO orders (address_from, address_to, client_id, driver_id, date_created, status) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Order>(&sql)
            .bind(&order.address_from)
            .bind(&order.address_to)
            .bind(ClientId::UNASSIGNED)
            .bind(DriverId::UNASSIGNED)
            .bind(now)
            .bind(OrderStatus::NotAccepted)
            .fetch_one(self.pool)
            .await?;

        Ok(row)
    }

    /// Get every order with the given ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
        let rows = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Get the current status of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_of(&self, id: OrderId) -> Result<Option<OrderStatus>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        status_of(&mut conn, id).await
    }

    /// Attach a client and driver and move the order to `in_progress`.
    ///
    /// Refreshes `date_created` to `now`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn assign(
        &self,
        id: OrderId,
        assignment: Assignment,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, RepositoryError> {
        self.transition(id, OrderTransition::Assign, Some((assignment, now)))
            .await
    }

    /// Move the order to `cancelled`, leaving every other field untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn cancel(&self, id: OrderId) -> Result<TransitionOutcome, RepositoryError> {
        self.transition(id, OrderTransition::Cancel, None).await
    }

    /// Move the order to `done`, leaving every other field untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn complete(&self, id: OrderId) -> Result<TransitionOutcome, RepositoryError> {
        self.transition(id, OrderTransition::Complete, None).await
    }

    async fn transition(
        &self,
        id: OrderId,
        transition: OrderTransition,
        assignment: Option<(Assignment, DateTime<Utc>)>,
    ) -> Result<TransitionOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE orders SET status = ");
        query.push_bind(transition.target());
        if let Some((assignment, now)) = assignment {
            query
                .push(", client_id = ")
                .push_bind(assignment.client_id)
                .push(", driver_id = ")
                .push_bind(assignment.driver_id)
                .push(", date_created = ")
                .push_bind(now);
        }
        query.push(" WHERE id = ").push_bind(id);
        query.push(" AND status IN (");
        let mut allowed = query.separated(", ");
        for status in transition.allowed_from() {
            allowed.push_bind(*status);
        }
        allowed.push_unseparated(") RETURNING ");
        query.push(ORDER_COLUMNS);

        let updated = query
            .build_query_as::<Order>()
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(order) = updated {
            tx.commit().await?;
            return Ok(TransitionOutcome::Applied(order));
        }

        // Nothing matched the guard: classify inside the same transaction.
        match status_of(&mut tx, id).await? {
            Some(current) => Ok(TransitionOutcome::Rejected(current)),
            None => Ok(TransitionOutcome::Missing),
        }
    }
}

async fn status_of(
    conn: &mut SqliteConnection,
    id: OrderId,
) -> Result<Option<OrderStatus>, RepositoryError> {
    let status = sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use taxi_dispatch_core::Address;

    use super::*;
    use crate::db::test_support::memory_pool;

    fn new_order(from: &str, to: &str) -> NewOrder {
        NewOrder {
            address_from: Address::parse(from).unwrap(),
            address_to: Address::parse(to).unwrap(),
        }
    }

    fn assignment(client: i64, driver: i64) -> Assignment {
        Assignment {
            client_id: ClientId::new(client),
            driver_id: DriverId::new(driver),
        }
    }

    fn applied(outcome: TransitionOutcome) -> Order {
        match outcome {
            TransitionOutcome::Applied(order) => order,
            other => panic!("expected applied transition, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_starts_unassigned_and_not_accepted() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);

        let order = repo.create(&new_order("A", "B"), Utc::now()).await.unwrap();

        assert_eq!(order.status, OrderStatus::NotAccepted);
        assert!(order.client_id.is_unassigned());
        assert!(order.driver_id.is_unassigned());
        assert_eq!(order.address_from.as_str(), "A");
        assert_eq!(order.address_to.as_str(), "B");
    }

    #[tokio::test]
    async fn test_assign_sets_ids_status_and_timestamp() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let created_at = Utc::now();
        let order = repo.create(&new_order("A", "B"), created_at).await.unwrap();

        let later = created_at + Duration::seconds(30);
        let updated = applied(repo.assign(order.id, assignment(5, 7), later).await.unwrap());

        assert_eq!(updated.status, OrderStatus::InProgress);
        assert_eq!(updated.client_id, ClientId::new(5));
        assert_eq!(updated.driver_id, DriverId::new(7));
        assert!(updated.date_created > order.date_created);
        assert_eq!(updated.address_from, order.address_from);
    }

    #[tokio::test]
    async fn test_second_assign_is_rejected_without_changes() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("A", "B"), Utc::now()).await.unwrap();
        let first = applied(
            repo.assign(order.id, assignment(5, 7), Utc::now())
                .await
                .unwrap(),
        );

        let outcome = repo
            .assign(order.id, assignment(9, 9), Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome, TransitionOutcome::Rejected(OrderStatus::InProgress));
        let stored = repo.find_by_id(order.id).await.unwrap();
        assert_eq!(stored, vec![first]);
    }

    #[tokio::test]
    async fn test_cancel_changes_only_status() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("A", "B"), Utc::now()).await.unwrap();

        let cancelled = applied(repo.cancel(order.id).await.unwrap());

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(
            Order {
                status: OrderStatus::NotAccepted,
                ..cancelled
            },
            order
        );
    }

    #[tokio::test]
    async fn test_cancelled_order_rejects_everything() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("A", "B"), Utc::now()).await.unwrap();
        applied(repo.cancel(order.id).await.unwrap());

        let rejected = TransitionOutcome::Rejected(OrderStatus::Cancelled);
        assert_eq!(
            repo.assign(order.id, assignment(1, 2), Utc::now())
                .await
                .unwrap(),
            rejected
        );
        assert_eq!(repo.cancel(order.id).await.unwrap(), rejected);
        assert_eq!(repo.complete(order.id).await.unwrap(), rejected);
    }

    #[tokio::test]
    async fn test_complete_requires_in_progress() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("A", "B"), Utc::now()).await.unwrap();

        assert_eq!(
            repo.complete(order.id).await.unwrap(),
            TransitionOutcome::Rejected(OrderStatus::NotAccepted)
        );

        applied(
            repo.assign(order.id, assignment(1, 2), Utc::now())
                .await
                .unwrap(),
        );
        let done = applied(repo.complete(order.id).await.unwrap());
        assert_eq!(done.status, OrderStatus::Done);
        assert_eq!(
            repo.cancel(order.id).await.unwrap(),
            TransitionOutcome::Rejected(OrderStatus::Done)
        );
    }

    #[tokio::test]
    async fn test_transitions_on_missing_order_fail_closed() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let id = OrderId::new(404);

        assert_eq!(
            repo.assign(id, assignment(1, 2), Utc::now()).await.unwrap(),
            TransitionOutcome::Missing
        );
        assert_eq!(repo.cancel(id).await.unwrap(), TransitionOutcome::Missing);
        assert!(repo.find_by_id(id).await.unwrap().is_empty());
        assert_eq!(repo.status_of(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_status_is_stored_as_snake_case_text() {
        let pool = memory_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("A", "B"), Utc::now()).await.unwrap();

        let raw: String = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
            .bind(order.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(raw, "not_accepted");
    }
}
