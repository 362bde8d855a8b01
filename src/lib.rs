//! Staledesk: a helpdesk-compatible mock REST API.
//!
//! Serves an in-memory set of contacts, seeded from `conf.json`, through the
//! helpdesk's `/api/v2/contacts` request and response shapes so integration
//! tests can run against a local stand-in.

// Domain
pub mod models;
pub mod service;
pub mod store;

// Surfaces
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{load_seed, SeedData, ServerConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use models::{Contact, ContactId};
pub use service::ContactService;
pub use store::ContactStore;
