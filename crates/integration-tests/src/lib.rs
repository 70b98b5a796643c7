//! End-to-end test harness for taxi dispatch.
//!
//! Each [`TestContext`] spawns the full application on an ephemeral port,
//! backed by its own `SQLite` database, and talks to it over real HTTP with
//! `reqwest`. The default database is in memory on a single connection;
//! [`TestContext::with_database_file`] gives a file with a real pool so
//! requests can overlap.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p taxi-dispatch-integration-tests
//! ```

#![allow(clippy::expect_used)]

use std::net::SocketAddr;

use reqwest::{Client, Response, redirect::Policy};
use sqlx::SqlitePool;
use tempfile::TempDir;

use taxi_dispatch::config::{DeletePolicy, DispatchConfig};
use taxi_dispatch::state::AppState;

/// A running server plus a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: SqlitePool,
    _db_dir: Option<TempDir>,
}

impl TestContext {
    /// Start a server with the default delete policy.
    pub async fn new() -> Self {
        Self::with_delete_policy(DeletePolicy::Preserve).await
    }

    /// Start a server with the given delete policy.
    pub async fn with_delete_policy(delete_policy: DeletePolicy) -> Self {
        let pool = taxi_dispatch::db::create_pool("sqlite::memory:", 1)
            .await
            .expect("in-memory pool");
        Self::start(pool, delete_policy, None).await
    }

    /// Start a server on a temporary database file with `max_connections`
    /// pooled connections, so concurrent requests really run side by side.
    pub async fn with_database_file(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite://{}", dir.path().join("taxi.db").display());
        let pool = taxi_dispatch::db::create_pool(&url, max_connections)
            .await
            .expect("file pool");
        Self::start(pool, DeletePolicy::Preserve, Some(dir)).await
    }

    async fn start(pool: SqlitePool, delete_policy: DeletePolicy, db_dir: Option<TempDir>) -> Self {
        taxi_dispatch::db::migrate(&pool).await.expect("migrations");

        let config = DispatchConfig {
            delete_policy,
            ..DispatchConfig::default()
        };
        let app = taxi_dispatch::app(AppState::new(config, pool.clone()));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });

        // Redirects are asserted on, not followed.
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("http client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            pool,
            _db_dir: db_dir,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET path`.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// `POST path` with a urlencoded form body.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// Status, client id, and driver id of a stored order.
    pub async fn order_row(&self, id: i64) -> (String, i64, i64) {
        sqlx::query_as("SELECT status, client_id, driver_id FROM orders WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .expect("order row")
    }

    /// Number of rows in `table`.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("row count")
    }
}
