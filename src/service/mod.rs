//! Contact service subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → contacts.rs (ContactService: list/get/filter/add/update/delete)
//!     → validation.rs (uniqueness, required, at-least-one)
//!     → filter.rs (list filters, search query parsing)
//!     → store.rs (ID → Contact map behind the service lock)
//! ```
//!
//! # Design Decisions
//! - One write lock covers validate → allocate ID → insert
//! - Failed validation leaves the store untouched
//! - Errors carry per-field detail for the HTTP error envelope

pub mod contacts;
pub mod filter;
pub mod validation;

use thiserror::Error;

use crate::models::ContactId;

pub use contacts::ContactService;
pub use filter::{FilterOutcome, FilterResponse, ListQuery};
pub use validation::FieldError;

/// Errors returned by contact operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Contact {0} not found")]
    NotFound(ContactId),

    #[error("No free contact ID found after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },
}

pub type ServiceResult<T> = Result<T, ServiceError>;
