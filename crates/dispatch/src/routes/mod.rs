//! HTTP route handlers for the operator pages.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page
//!
//! # Clients
//! GET  /client                     - Create and lookup forms
//! GET  /new_client                 - Create form
//! POST /new_client                 - Create client (name, is_vip)
//! POST /show_client                - Lookup by client_id
//! GET|POST /show_client/{id}/del   - Delete client, redirect to /
//!
//! # Drivers
//! GET  /driver                     - Create and lookup forms
//! GET  /new_driver                 - Create form
//! POST /new_driver                 - Create driver (name, car)
//! POST /show_driver                - Lookup by driver_id
//! GET|POST /show_driver/{id}/del   - Delete driver, redirect to /
//!
//! # Orders
//! GET  /order                      - Create and lookup forms
//! GET  /add_order                  - Create form
//! POST /add_order                  - Create order (address_from, address_to)
//! POST /show_order                 - Lookup by order_id
//! GET|POST /show_order/{id}/cancel - Cancel, redirect to /
//! GET|POST /show_order/{id}/change - Assign (Client_id, Driver_id), redirect to /
//! ```
//!
//! Health endpoints live in [`health`] and are mounted by [`crate::app`].

pub mod clients;
pub mod drivers;
pub mod health;
pub mod home;
pub mod orders;

use std::str::FromStr;

use axum::{
    Form, Router,
    extract::{
        Path, Query,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    routing::{get, post},
};

use crate::services::DispatchError;
use crate::state::AppState;

/// Create the operator page router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .merge(client_routes())
        .merge(driver_routes())
        .merge(order_routes())
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/client", get(clients::section))
        .route("/new_client", get(clients::section).post(clients::create))
        .route("/show_client", post(clients::show))
        .route(
            "/show_client/{id}/del",
            get(clients::delete).post(clients::delete),
        )
}

fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/driver", get(drivers::section))
        .route("/new_driver", get(drivers::section).post(drivers::create))
        .route("/show_driver", post(drivers::show))
        .route(
            "/show_driver/{id}/del",
            get(drivers::delete).post(drivers::delete),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/order", get(orders::section))
        .route("/add_order", get(orders::section).post(orders::create))
        .route("/show_order", post(orders::show))
        .route(
            "/show_order/{id}/cancel",
            get(orders::cancel).post(orders::cancel),
        )
        .route(
            "/show_order/{id}/change",
            get(orders::change_from_query).post(orders::change),
        )
}

/// Unwrap a form body, turning an unreadable one into a validation error.
///
/// Covers a missing or wrong `Content-Type` as well as undecodable bodies,
/// so the page still answers with its own message.
pub(crate) fn form_input<T>(form: Result<Form<T>, FormRejection>) -> Result<T, DispatchError> {
    form.map(|Form(value)| value)
        .map_err(|rejection| DispatchError::Validation {
            field: "form",
            reason: rejection.body_text(),
        })
}

/// Unwrap query parameters, turning undecodable ones into a validation error.
pub(crate) fn query_input<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, DispatchError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| DispatchError::Validation {
            field: "query",
            reason: rejection.body_text(),
        })
}

/// Parse the `{id}` path segment. An id that is not an integer names no
/// record, so it is reported as not found.
pub(crate) fn path_id<T: FromStr>(
    entity: &'static str,
    path: Result<Path<String>, PathRejection>,
) -> Result<T, DispatchError> {
    let Path(raw) = path.map_err(|rejection| DispatchError::Validation {
        field: "id",
        reason: rejection.body_text(),
    })?;
    raw.parse().map_err(|_| DispatchError::not_found(entity, raw))
}
