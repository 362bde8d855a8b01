//! Contact API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::request::{ContactIdPath, JsonBody, QueryParams};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::models::Contact;
use crate::service::ListQuery;

/// Query string of `GET /search/contacts`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub contacts: usize,
}

pub async fn list_contacts(
    State(state): State<AppState>,
    QueryParams(filters): QueryParams<ListQuery>,
) -> Json<Vec<Contact>> {
    Json(state.service.list(&filters).await)
}

pub async fn get_contact(
    State(state): State<AppState>,
    ContactIdPath(id): ContactIdPath,
) -> Result<Response, ApiError> {
    match state.service.get(id).await {
        Some(contact) => Ok((StatusCode::OK, Json(contact)).into_response()),
        None => Err(ApiError::NotFound),
    }
}

pub async fn create_contact(
    State(state): State<AppState>,
    JsonBody(contact): JsonBody<Contact>,
) -> Result<Response, ApiError> {
    let created = state.service.add(contact).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn update_contact(
    State(state): State<AppState>,
    ContactIdPath(id): ContactIdPath,
    JsonBody(patch): JsonBody<Contact>,
) -> Result<Response, ApiError> {
    let updated = state.service.update(id, patch).await?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}

pub async fn delete_contact(
    State(state): State<AppState>,
    ContactIdPath(id): ContactIdPath,
) -> StatusCode {
    state.service.delete(id).await;
    StatusCode::NO_CONTENT
}

pub async fn search_contacts(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
    QueryParams(filters): QueryParams<ListQuery>,
) -> Response {
    let outcome = state.service.filter(&params.query, &filters).await;
    (StatusCode::OK, Json(outcome)).into_response()
}

/// `GET /contacts/autocomplete`: accepted, no results produced.
pub async fn autocomplete() -> StatusCode {
    StatusCode::OK
}

/// `GET /contacts/export/{id}`: accepted, no export workflow behind it.
pub async fn export_status() -> StatusCode {
    StatusCode::OK
}

/// `POST /contacts/export`: accepted, no export workflow behind it.
pub async fn export_start() -> StatusCode {
    StatusCode::OK
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        contacts: state.service.len().await,
    })
}
