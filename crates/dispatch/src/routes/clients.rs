//! Client route handlers.

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

use taxi_dispatch_core::ClientId;

use super::{form_input, path_id};
use crate::error::{AppError, Result};
use crate::services::forms::{ClientForm, ClientLookupForm};
use crate::state::AppState;
use crate::views::{ClientView, MessageTemplate};

/// Client section: create and lookup forms.
#[derive(Template, WebTemplate)]
#[template(path = "client.html")]
pub struct ClientSectionTemplate;

/// Lookup results.
#[derive(Template, WebTemplate)]
#[template(path = "show_client.html")]
pub struct ShowClientTemplate {
    pub clients: Vec<ClientView>,
}

/// Render the client forms.
pub async fn section() -> ClientSectionTemplate {
    ClientSectionTemplate
}

/// Create a client.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    form: std::result::Result<Form<ClientForm>, FormRejection>,
) -> Result<MessageTemplate> {
    let context = AppError::context("Error in new_client");
    let form = form_input(form).map_err(context)?;
    state
        .records()
        .create_client(&form)
        .await
        .map_err(context)?;

    Ok(MessageTemplate::success("Client added"))
}

/// Look up a client by ID.
#[instrument(skip(state, form))]
pub async fn show(
    State(state): State<AppState>,
    form: std::result::Result<Form<ClientLookupForm>, FormRejection>,
) -> Result<ShowClientTemplate> {
    let context = AppError::context("There is no such client");
    let id = form_input(form)
        .and_then(|form| form.validate())
        .map_err(context)?;
    let clients = state.records().find_clients(id).await.map_err(context)?;

    Ok(ShowClientTemplate {
        clients: clients.iter().map(ClientView::from).collect(),
    })
}

/// Delete a client, then return home.
#[instrument(skip(state, path))]
pub async fn delete(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Redirect> {
    let context = AppError::context("Error in delete_client");
    let id: ClientId = path_id("client", path).map_err(context)?;
    state
        .records()
        .delete_client(id)
        .await
        .map_err(context)?;

    Ok(Redirect::to("/"))
}
