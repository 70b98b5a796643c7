//! Driver route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    response::Redirect,
};
use tracing::instrument;

use taxi_dispatch_core::DriverId;

use super::{form_input, path_id};
use crate::error::{AppError, Result};
use crate::services::forms::{DriverForm, DriverLookupForm};
use crate::state::AppState;
use crate::views::{DriverView, MessageTemplate};

/// Driver section: create and lookup forms.
#[derive(Template, WebTemplate)]
#[template(path = "driver.html")]
pub struct DriverSectionTemplate;

/// Lookup results.
#[derive(Template, WebTemplate)]
#[template(path = "show_driver.html")]
pub struct ShowDriverTemplate {
    pub drivers: Vec<DriverView>,
}

/// Render the driver forms.
pub async fn section() -> DriverSectionTemplate {
    DriverSectionTemplate
}

/// Create a driver.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    form: std::result::Result<Form<DriverForm>, FormRejection>,
) -> Result<MessageTemplate> {
    let context = AppError::context("Error in new_driver");
    let form = form_input(form).map_err(context)?;
    state
        .records()
        .create_driver(&form)
        .await
        .map_err(context)?;

    Ok(MessageTemplate::success("Driver added"))
}

/// Look up a driver by ID.
#[instrument(skip(state, form))]
pub async fn show(
    State(state): State<AppState>,
    form: std::result::Result<Form<DriverLookupForm>, FormRejection>,
) -> Result<ShowDriverTemplate> {
    let context = AppError::context("There is no such driver");
    let id = form_input(form)
        .and_then(|form| form.validate())
        .map_err(context)?;
    let drivers = state.records().find_drivers(id).await.map_err(context)?;

    Ok(ShowDriverTemplate {
        drivers: drivers.iter().map(DriverView::from).collect(),
    })
}

/// Delete a driver, then return home.
#[instrument(skip(state, path))]
pub async fn delete(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Redirect> {
    let context = AppError::context("Error in delete_driver");
    let id: DriverId = path_id("driver", path).map_err(context)?;
    state
        .records()
        .delete_driver(id)
        .await
        .map_err(context)?;

    Ok(Redirect::to("/"))
}
