//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Seed the contact store and build the service
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{validate_config, ConfigError, SeedData, ServerConfig};
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::service::ContactService;
use crate::store::ContactStore;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the contact service from seed data.
pub fn build_service(config: &ServerConfig, seed: SeedData) -> Arc<ContactService> {
    let store = ContactStore::from_seed(seed.contacts);
    tracing::info!(contacts = store.len(), source = %seed.path.display(), "Contact store seeded");
    Arc::new(ContactService::new(store, config.contacts.clone()))
}

/// Bind the configured listener address.
pub async fn bind_listener(config: &ServerConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

/// Validate, seed, bind and serve until shutdown.
pub async fn run(
    config: ServerConfig,
    seed: SeedData,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        update_missing = ?config.contacts.update_missing,
        "Configuration loaded"
    );

    if config.listener.require_auth {
        tracing::warn!("require-auth is set but authentication is not enforced by this server");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let service = build_service(&config, seed);
    let listener = bind_listener(&config).await?;

    HttpServer::new(config, service)
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}
