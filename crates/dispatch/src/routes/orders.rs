//! Order route handlers.
//!
//! Transitions redirect home on success. A rejected transition renders the
//! reason with 409 and leaves the order untouched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    response::Redirect,
};
use tracing::instrument;

use taxi_dispatch_core::OrderId;

use super::{form_input, path_id, query_input};
use crate::error::{AppError, Result};
use crate::services::forms::{AssignForm, OrderForm, OrderLookupForm};
use crate::state::AppState;
use crate::views::{MessageTemplate, OrderView};

const CHANGE_FAILED: &str = "Error happened in change_order";

/// Order section: create and lookup forms.
#[derive(Template, WebTemplate)]
#[template(path = "order.html")]
pub struct OrderSectionTemplate;

/// Lookup results, with the actions each order's status still permits.
#[derive(Template, WebTemplate)]
#[template(path = "show_order.html")]
pub struct ShowOrderTemplate {
    pub orders: Vec<OrderView>,
}

/// Render the order forms.
pub async fn section() -> OrderSectionTemplate {
    OrderSectionTemplate
}

/// Create a `not_accepted` order.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    form: std::result::Result<Form<OrderForm>, FormRejection>,
) -> Result<MessageTemplate> {
    let context = AppError::context("Error in new_order");
    let form = form_input(form).map_err(context)?;
    state.lifecycle().create(&form).await.map_err(context)?;

    Ok(MessageTemplate::success("Order added!"))
}

/// Look up an order by ID.
#[instrument(skip(state, form))]
pub async fn show(
    State(state): State<AppState>,
    form: std::result::Result<Form<OrderLookupForm>, FormRejection>,
) -> Result<ShowOrderTemplate> {
    let context = AppError::context("There is no such order");
    let id = form_input(form)
        .and_then(|form| form.validate())
        .map_err(context)?;
    let orders = state.records().find_orders(id).await.map_err(context)?;

    Ok(ShowOrderTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Cancel an order.
#[instrument(skip(state, path))]
pub async fn cancel(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Redirect> {
    let context = AppError::context("Error happened during cancelling");
    let id: OrderId = path_id("order", path).map_err(context)?;
    state.lifecycle().cancel(id).await.map_err(context)?;

    Ok(Redirect::to("/"))
}

/// Assign a client and driver from a submitted form.
#[instrument(skip(state, path, form))]
pub async fn change(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
    form: std::result::Result<Form<AssignForm>, FormRejection>,
) -> Result<Redirect> {
    let context = AppError::context(CHANGE_FAILED);
    let id = path_id("order", path).map_err(context)?;
    let form = form_input(form).map_err(context)?;
    assign(&state, id, &form).await
}

/// Assign from query parameters. A bare GET carries none and fails validation.
#[instrument(skip(state, path, query))]
pub async fn change_from_query(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
    query: std::result::Result<Query<AssignForm>, QueryRejection>,
) -> Result<Redirect> {
    let context = AppError::context(CHANGE_FAILED);
    let id = path_id("order", path).map_err(context)?;
    let form = query_input(query).map_err(context)?;
    assign(&state, id, &form).await
}

async fn assign(state: &AppState, id: OrderId, form: &AssignForm) -> Result<Redirect> {
    state
        .lifecycle()
        .assign(id, form)
        .await
        .map_err(AppError::context(CHANGE_FAILED))?;

    Ok(Redirect::to("/"))
}
