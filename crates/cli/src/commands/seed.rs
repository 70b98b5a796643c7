//! Seed the database with demo records.
//!
//! Inserts a few clients and drivers and one order in each status, so the
//! operator pages have something to show on a fresh database.

use taxi_dispatch::models::{Assignment, NewClient, NewDriver, NewOrder};
use taxi_dispatch::services::{OrderLifecycle, RecordService};
use taxi_dispatch_core::{Address, CarDescription, PersonName};

use super::CommandError;

const CLIENTS: &[(&str, bool)] = &[("Anna Petrova", true), ("Boris Ivanov", false)];

const DRIVERS: &[(&str, &str)] = &[
    ("Sergey Smirnov", "White Skoda Octavia"),
    ("Olga Kuznetsova", "Grey Kia Rio"),
];

const ROUTES: &[(&str, &str)] = &[
    ("12 Lenin St", "Central Station"),
    ("Airport Terminal B", "45 Park Ave"),
    ("City Hospital", "7 River Rd"),
    ("Central Station", "Airport Terminal B"),
];

/// Insert demo data.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let (config, pool) = super::connect().await?;
    let records = RecordService::new(&pool, config.delete_policy);
    let lifecycle = OrderLifecycle::new(&pool);

    let mut clients = Vec::with_capacity(CLIENTS.len());
    for &(name, is_vip) in CLIENTS {
        let client = records
            .insert_client(&NewClient {
                name: PersonName::parse(name)?,
                is_vip,
            })
            .await?;
        clients.push(client.id);
    }

    let mut drivers = Vec::with_capacity(DRIVERS.len());
    for &(name, car) in DRIVERS {
        let driver = records
            .insert_driver(&NewDriver {
                name: PersonName::parse(name)?,
                car: CarDescription::parse(car)?,
            })
            .await?;
        drivers.push(driver.id);
    }

    let mut orders = Vec::with_capacity(ROUTES.len());
    for &(from, to) in ROUTES {
        let order = lifecycle
            .open(&NewOrder {
                address_from: Address::parse(from)?,
                address_to: Address::parse(to)?,
            })
            .await?;
        orders.push(order.id);
    }

    // Leave the first order waiting; move the rest along the lifecycle.
    let pairs = clients.iter().zip(drivers.iter()).cycle();
    for (&order_id, (&client_id, &driver_id)) in orders.iter().skip(1).zip(pairs) {
        lifecycle
            .assign_to(
                order_id,
                Assignment {
                    client_id,
                    driver_id,
                },
            )
            .await?;
    }
    if let Some(&id) = orders.get(2) {
        lifecycle.complete(id).await?;
    }
    if let Some(&id) = orders.get(3) {
        lifecycle.cancel(id).await?;
    }

    tracing::info!(
        clients = clients.len(),
        drivers = drivers.len(),
        orders = orders.len(),
        "Seed complete"
    );
    pool.close().await;
    Ok(())
}
