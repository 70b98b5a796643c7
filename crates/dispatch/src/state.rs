//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::DispatchConfig;
use crate::services::{OrderLifecycle, RecordService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers borrow the pool per request; there is
/// no long-lived session object.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DispatchConfig,
    pool: SqlitePool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: DispatchConfig, pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the dispatch configuration.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Client/driver/order record operations, honouring the configured delete policy.
    #[must_use]
    pub fn records(&self) -> RecordService<'_> {
        RecordService::new(self.pool(), self.config().delete_policy)
    }

    /// Order status transitions.
    #[must_use]
    pub fn lifecycle(&self) -> OrderLifecycle<'_> {
        OrderLifecycle::new(self.pool())
    }
}
