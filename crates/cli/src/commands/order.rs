//! Order administration commands.
//!
//! # Usage
//!
//! ```bash
//! # Mark an in-progress order as done
//! taxi-cli order complete 42
//!
//! # Print an order
//! taxi-cli order show 42
//! ```
//!
//! `complete` is the only way an order reaches `done`; the operator pages
//! never offer it.

use taxi_dispatch::models::Order;
use taxi_dispatch::services::{OrderLifecycle, RecordService};
use taxi_dispatch_core::OrderId;

use super::CommandError;

/// Move an `in_progress` order to `done`.
///
/// # Errors
///
/// Returns `CommandError::Dispatch` if the order does not exist or is not
/// `in_progress`.
pub async fn complete(id: OrderId) -> Result<(), CommandError> {
    let (_config, pool) = super::connect().await?;
    let order = OrderLifecycle::new(&pool).complete(id).await;
    pool.close().await;

    let order = order?;
    print_order(&order);
    Ok(())
}

/// Print an order.
///
/// # Errors
///
/// Returns `CommandError::Dispatch` if the order does not exist.
pub async fn show(id: OrderId) -> Result<(), CommandError> {
    let (config, pool) = super::connect().await?;
    let orders = RecordService::new(&pool, config.delete_policy)
        .find_orders(id)
        .await;
    pool.close().await;

    for order in &orders? {
        print_order(order);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_order(order: &Order) {
    println!("order {}", order.id);
    println!("  from:    {}", order.address_from);
    println!("  to:      {}", order.address_to);
    println!("  client:  {}", order.client_id);
    println!("  driver:  {}", order.driver_id);
    println!("  updated: {}", order.date_created.to_rfc3339());
    println!("  status:  {}", order.status);
}
