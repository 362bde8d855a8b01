//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all contact handlers under `/api/v2`
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Bind server to listener
//! - Serve until a shutdown signal arrives

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers::*;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::service::ContactService;

/// Path prefix of the emulated API.
pub const API_PATH_BASE: &str = "/api/v2";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContactService>,
}

impl AppState {
    pub fn new(service: Arc<ContactService>) -> Self {
        Self { service }
    }
}

/// HTTP server for the contact API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an existing contact service.
    pub fn new(config: ServerConfig, service: Arc<ContactService>) -> Self {
        let router = build_router(&config, AppState::new(service));
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on Ctrl-C/SIGTERM or when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_base = API_PATH_BASE,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Contact routes, relative to [`API_PATH_BASE`].
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/", get(list_contacts).post(create_contact))
        .route("/contacts/autocomplete", get(autocomplete))
        .route("/contacts/export", post(export_start))
        .route("/contacts/export/{id}", get(export_status))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/search/contacts", get(search_contacts))
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    Router::new()
        .nest(API_PATH_BASE, api_routes())
        .route("/health", get(health))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// Record per-route request metrics.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let response = next.run(request).await;

    tracing::debug!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        elapsed = ?start.elapsed(),
        "Request handled"
    );
    metrics::record_request(&method, response.status().as_u16(), &route, start);
    response
}
