//! Driver domain model.

use serde::Serialize;
use taxi_dispatch_core::{CarDescription, DriverId, PersonName};

/// A stored driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Driver {
    /// Unique driver ID.
    pub id: DriverId,
    /// Display name.
    pub name: PersonName,
    /// Car make, colour, and plate as entered by the operator.
    pub car: CarDescription,
}

/// Validated input for creating a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDriver {
    pub name: PersonName,
    pub car: CarDescription,
}
