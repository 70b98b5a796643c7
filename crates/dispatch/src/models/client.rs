//! Client domain model.

use serde::Serialize;
use taxi_dispatch_core::{ClientId, PersonName};

/// A stored client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Client {
    /// Unique client ID.
    pub id: ClientId,
    /// Display name.
    pub name: PersonName,
    /// Whether the client gets VIP treatment.
    pub is_vip: bool,
}

/// Validated input for creating a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: PersonName,
    pub is_vip: bool,
}
