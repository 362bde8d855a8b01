//! Response mapping.
//!
//! # Responsibilities
//! - Map service and extraction errors to helpdesk status codes
//! - Render the `{description, errors: [{field, message, code}]}` envelope
//!
//! # Design Decisions
//! - Unknown IDs on read answer 404 with an empty body
//! - Body decode failures are caller errors (400); failing to read the body
//!   at all is an unexpected binding failure (500)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::{FieldError, ServiceError};

pub const CODE_INVALID_ID: &str = "invalid_id";
pub const CODE_INVALID_QUERY: &str = "invalid_query";
pub const CODE_NEW_CONTACT_FAILURE: &str = "new_contact_failure";
pub const CODE_ID_ALLOCATION_FAILURE: &str = "id_allocation_failure";

/// Error envelope returned for every 4xx/5xx with a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub description: String,
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    fn single(description: impl Into<String>, field: &str, message: impl Into<String>, code: &str) -> Self {
        Self {
            description: description.into(),
            errors: vec![FieldError::new(field, message, code)],
        }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid contact id specified")]
    InvalidId,

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("bind failed: {0}")]
    BindFailed(String),

    #[error("unable to read request body: {0}")]
    BodyUnreadable(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("contact not found")]
    NotFound,

    #[error(transparent)]
    Service(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Service(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidId => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::single("invalid contact id specified", "id", "id is not an integer", CODE_INVALID_ID),
            ),
            ApiError::InvalidQuery(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::single("invalid query string", "query", reason, CODE_INVALID_QUERY),
            ),
            ApiError::BindFailed(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::single(
                    "unable to process contact",
                    "",
                    format!("bind failed: {reason}"),
                    CODE_NEW_CONTACT_FAILURE,
                ),
            ),
            ApiError::BodyUnreadable(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::single(
                    "unable to process contact",
                    "",
                    format!("bind failed: {reason}"),
                    CODE_NEW_CONTACT_FAILURE,
                ),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    description: "Validation failed".to_string(),
                    errors,
                },
            ),
            ApiError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::Service(err) => {
                tracing::error!(error = %err, "Contact service failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::single(
                        "unable to process contact",
                        "id",
                        err.to_string(),
                        CODE_ID_ALLOCATION_FAILURE,
                    ),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
