//! Request handling and extraction.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Parse contact IDs from the path
//! - Decode query strings into typed filters
//! - Decode JSON bodies leniently (no Content-Type requirement)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Extraction failures map straight to the helpdesk error envelope

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{request::Parts, HeaderValue},
};
use serde::de::DeserializeOwned;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::models::ContactId;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Parse a path segment as a contact ID.
pub fn parse_contact_id(raw: &str) -> Result<ContactId, ApiError> {
    raw.parse::<ContactId>().map_err(|_| {
        tracing::debug!(id = %raw, "Rejected non-integer contact ID");
        ApiError::InvalidId
    })
}

/// The `{id}` path parameter as a contact ID.
#[derive(Debug, Clone, Copy)]
pub struct ContactIdPath(pub ContactId);

impl<S> FromRequestParts<S> for ContactIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId)?;
        parse_contact_id(&raw).map(ContactIdPath)
    }
}

/// Query string decoded into `T`, rejected with the helpdesk error envelope.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected query string");
                ApiError::InvalidQuery(rejection.body_text())
            })?;
        Ok(QueryParams(params))
    }
}

/// JSON body decoded regardless of the request's Content-Type.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "Failed to read request body");
            ApiError::BodyUnreadable(rejection.body_text())
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "Failed to bind JSON body");
            ApiError::BindFailed(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact_id() {
        assert_eq!(parse_contact_id("123456789012").unwrap(), 123456789012);
        assert_eq!(parse_contact_id("-5").unwrap(), -5);
        assert!(matches!(parse_contact_id("abc"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_contact_id("12.5"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_contact_id(""), Err(ApiError::InvalidId)));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let request = axum::http::Request::new(());
        let mut maker = UuidRequestId;
        let first = maker.make_request_id(&request).unwrap();
        let second = maker.make_request_id(&request).unwrap();
        assert_ne!(first.header_value(), second.header_value());
    }
}
