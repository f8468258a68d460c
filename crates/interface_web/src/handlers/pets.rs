//! Pet record handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use domain_pet::PetSubmission;

use crate::dto::pet::PetPayload;
use crate::error::{WebError, LIST_FAILED, LOOKUP_FAILED, SUBMIT_FAILED};
use crate::views;
use crate::AppState;

/// Renders the listing of all pet records
pub async fn list_pets(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let records = state
        .service
        .list()
        .await
        .map_err(|e| WebError::from_pet(e, LIST_FAILED))?;

    Ok(Html(views::listing::render(&records)))
}

/// Renders an empty create form
pub async fn new_pet_form() -> Html<String> {
    Html(views::form::render(None))
}

/// Renders the edit form for the record with the given external id
pub async fn edit_pet_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let pet = state
        .service
        .find(&id)
        .await
        .map_err(|e| WebError::from_pet(e, LOOKUP_FAILED))?;

    Ok(Html(views::form::render(Some(&pet))))
}

/// Creates or updates a record, then redirects to the listing
pub async fn submit_pet(
    State(state): State<AppState>,
    PetPayload(form): PetPayload,
) -> Result<Response, WebError> {
    let outcome = state
        .service
        .reconcile(PetSubmission::from(form))
        .await
        .map_err(|e| WebError::from_pet(e, SUBMIT_FAILED))?;

    info!(
        external_id = %outcome.external_id(),
        internal_id = %outcome.internal_id(),
        created = outcome.is_created(),
        "Pet record saved"
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]).into_response())
}
