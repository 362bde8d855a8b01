//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults + CLI flags / STALE_* env
//!     → schema.rs (ServerConfig)
//!     → validation.rs (semantic checks)
//!     → passed by value to the HTTP server and contact service
//!
//! conf.json (../config/ or config/)
//!     → loader.rs (read, parse, extract data.contacts)
//!     → SeedData
//!     → ContactStore::from_seed
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no global registry
//! - All fields have defaults to allow minimal invocations
//! - Seed loading failures are fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_seed, ConfigError, SeedData};
pub use schema::{
    ContactsConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServerConfig,
    TimeoutConfig, UpdateMissingPolicy,
};
pub use validation::{validate_config, ValidationError};
