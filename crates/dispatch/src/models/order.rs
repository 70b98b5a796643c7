//! Order domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use taxi_dispatch_core::{Address, ClientId, DriverId, OrderId, OrderStatus};

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Pickup address.
    pub address_from: Address,
    /// Drop-off address.
    pub address_to: Address,
    /// Assigned client, or [`ClientId::UNASSIGNED`].
    pub client_id: ClientId,
    /// Assigned driver, or [`DriverId::UNASSIGNED`].
    pub driver_id: DriverId,
    /// Creation time, refreshed when the order is assigned.
    pub date_created: DateTime<Utc>,
    /// Lifecycle status.
    pub status: OrderStatus,
}

/// Validated input for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub address_from: Address,
    pub address_to: Address,
}

/// Client and driver to attach when an order is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub client_id: ClientId,
    pub driver_id: DriverId,
}
