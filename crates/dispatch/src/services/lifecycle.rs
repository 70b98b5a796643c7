//! Order lifecycle controller.
//!
//! Creates orders and drives them through the status machine defined by
//! [`OrderTransition`]. Each transition is one guarded update in the
//! repository, so two operators acting on the same order cannot both win.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use taxi_dispatch_core::{OrderId, OrderTransition, TransitionError};

use super::DispatchError;
use super::forms::{AssignForm, OrderForm};
use crate::db::{OrderRepository, TransitionOutcome};
use crate::models::{Assignment, NewOrder, Order};

/// Order creation and status transitions.
pub struct OrderLifecycle<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderLifecycle<'a> {
    /// Create a lifecycle controller over `pool`.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Validate form input and create a `not_accepted` order.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Validation` if either address is missing or
    /// blank (nothing is stored), or `DispatchError::Storage` on insert failure.
    pub async fn create(&self, form: &OrderForm) -> Result<Order, DispatchError> {
        let order = form.validate()?;
        self.open(&order).await
    }

    /// Create a `not_accepted` order from already-validated input.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Storage` if the insert fails.
    #[instrument(skip(self, order))]
    pub async fn open(&self, order: &NewOrder) -> Result<Order, DispatchError> {
        let created = self.orders.create(order, Utc::now()).await?;
        tracing::info!(order_id = %created.id, status = %created.status, "Order created");
        Ok(created)
    }

    /// Validate form input and assign a client and driver.
    ///
    /// # Errors
    ///
    /// See [`Self::assign_to`]; additionally `DispatchError::Validation` for bad ids.
    pub async fn assign(&self, id: OrderId, form: &AssignForm) -> Result<Order, DispatchError> {
        let assignment = form.validate()?;
        self.assign_to(id, assignment).await
    }

    /// Assign a client and driver, moving `not_accepted` to `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::BusinessRule` if the order is not `not_accepted`,
    /// `DispatchError::NotFound` if it does not exist. Neither mutates anything.
    #[instrument(skip(self))]
    pub async fn assign_to(
        &self,
        id: OrderId,
        assignment: Assignment,
    ) -> Result<Order, DispatchError> {
        let outcome = self.orders.assign(id, assignment, Utc::now()).await?;
        settle(id, OrderTransition::Assign, outcome)
    }

    /// Cancel an order that is `not_accepted` or `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::BusinessRule` if the order is already terminal,
    /// `DispatchError::NotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order, DispatchError> {
        let outcome = self.orders.cancel(id).await?;
        settle(id, OrderTransition::Cancel, outcome)
    }

    /// Mark an `in_progress` order as `done`.
    ///
    /// Administrative only: exposed through the CLI, not the operator pages.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::BusinessRule` unless the order is `in_progress`,
    /// `DispatchError::NotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn complete(&self, id: OrderId) -> Result<Order, DispatchError> {
        let outcome = self.orders.complete(id).await?;
        settle(id, OrderTransition::Complete, outcome)
    }
}

fn settle(
    id: OrderId,
    transition: OrderTransition,
    outcome: TransitionOutcome,
) -> Result<Order, DispatchError> {
    match outcome {
        TransitionOutcome::Applied(order) => {
            tracing::info!(
                order_id = %id,
                %transition,
                to = %order.status,
                "Order transitioned"
            );
            Ok(order)
        }
        TransitionOutcome::Rejected(from) => {
            tracing::warn!(order_id = %id, %transition, %from, "Order transition rejected");
            Err(TransitionError { from, transition }.into())
        }
        TransitionOutcome::Missing => Err(DispatchError::not_found("order", id)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use taxi_dispatch_core::{ClientId, DriverId, OrderStatus};

    use super::*;
    use crate::config::DeletePolicy;
    use crate::db::test_support::memory_pool;
    use crate::services::RecordService;

    fn order_form(from: &str, to: &str) -> OrderForm {
        OrderForm {
            address_from: Some(from.into()),
            address_to: Some(to.into()),
        }
    }

    fn assign_form(client: i64, driver: i64) -> AssignForm {
        AssignForm {
            client_id: Some(client.to_string()),
            driver_id: Some(driver.to_string()),
        }
    }

    async fn stored(pool: &SqlitePool, id: OrderId) -> Order {
        let mut rows = RecordService::new(pool, DeletePolicy::Preserve)
            .find_orders(id)
            .await
            .unwrap();
        rows.remove(0)
    }

    #[tokio::test]
    async fn test_assign_then_reassign_then_cancel() {
        let pool = memory_pool().await;
        let lifecycle = OrderLifecycle::new(&pool);

        let order = lifecycle.create(&order_form("A", "B")).await.unwrap();
        assert_eq!(order.status, OrderStatus::NotAccepted);
        assert_eq!(order.client_id, ClientId::UNASSIGNED);
        assert_eq!(order.driver_id, DriverId::UNASSIGNED);

        let assigned = lifecycle.assign(order.id, &assign_form(5, 7)).await.unwrap();
        assert_eq!(assigned.status, OrderStatus::InProgress);
        assert_eq!(assigned.client_id, ClientId::new(5));
        assert_eq!(assigned.driver_id, DriverId::new(7));
        assert!(assigned.date_created >= order.date_created);

        let err = lifecycle
            .assign(order.id, &assign_form(8, 9))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "business_rule");
        assert_eq!(stored(&pool, order.id).await, assigned);

        let cancelled = lifecycle.cancel(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.client_id, ClientId::new(5));
        assert_eq!(cancelled.date_created, assigned.date_created);
    }

    #[tokio::test]
    async fn test_cancel_then_assign_is_rejected() {
        let pool = memory_pool().await;
        let lifecycle = OrderLifecycle::new(&pool);

        let order = lifecycle.create(&order_form("A", "B")).await.unwrap();
        let cancelled = lifecycle.cancel(order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let err = lifecycle
            .assign(order.id, &assign_form(5, 7))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::BusinessRule(_)));
        assert_eq!(stored(&pool, order.id).await, cancelled);
    }

    #[tokio::test]
    async fn test_blank_address_persists_nothing() {
        let pool = memory_pool().await;
        let lifecycle = OrderLifecycle::new(&pool);

        let err = lifecycle.create(&order_form("A", "")).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Validation {
                field: "address_to",
                ..
            }
        ));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_transitions_on_unknown_order_fail_closed() {
        let pool = memory_pool().await;
        let lifecycle = OrderLifecycle::new(&pool);
        let id = OrderId::new(123);

        let err = lifecycle.cancel(id).await.unwrap_err();
        assert!(matches!(err, DispatchError::NotFound { entity: "order", ref id } if id == "123"));
        let err = lifecycle.assign(id, &assign_form(1, 2)).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
        let err = lifecycle.complete(id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_done_is_terminal() {
        let pool = memory_pool().await;
        let lifecycle = OrderLifecycle::new(&pool);

        let order = lifecycle.create(&order_form("A", "B")).await.unwrap();
        lifecycle.assign(order.id, &assign_form(1, 2)).await.unwrap();
        let done = lifecycle.complete(order.id).await.unwrap();
        assert_eq!(done.status, OrderStatus::Done);

        assert!(lifecycle.cancel(order.id).await.is_err());
        assert!(lifecycle.assign(order.id, &assign_form(3, 4)).await.is_err());
        assert!(lifecycle.complete(order.id).await.is_err());
        assert_eq!(stored(&pool, order.id).await, done);
    }

    #[tokio::test]
    async fn test_invalid_assign_form_touches_nothing() {
        let pool = memory_pool().await;
        let lifecycle = OrderLifecycle::new(&pool);
        let order = lifecycle.create(&order_form("A", "B")).await.unwrap();

        let err = lifecycle
            .assign(order.id, &AssignForm::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "validation");
        assert_eq!(stored(&pool, order.id).await, order);
    }
}
