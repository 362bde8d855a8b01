//! HTTP façade subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, routing under /api/v2)
//!     → request.rs (request ID, contact ID path, lenient JSON body)
//!     → handlers.rs (delegate to ContactService)
//!     → response.rs (status codes, error envelope)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ContactIdPath, JsonBody, QueryParams, UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, ErrorResponse};
pub use server::{build_router, AppState, HttpServer, API_PATH_BASE};
