//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use staledesk::config::ServerConfig;
use staledesk::http::{build_router, AppState, HttpServer};
use staledesk::lifecycle::Shutdown;
use staledesk::models::Contact;
use staledesk::service::ContactService;
use staledesk::store::ContactStore;

pub const ADA_ID: i64 = 100000000001;
pub const GRACE_ID: i64 = 100000000002;
pub const LINUS_ID: i64 = 100000000003;

/// Three contacts with distinct contact methods and People IDs.
pub fn seed_contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: ADA_ID,
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            people_id: "abc123".into(),
            job_title: "Analyst".into(),
            language: "en".into(),
            ..Default::default()
        },
        Contact {
            id: GRACE_ID,
            name: "Grace Hopper".into(),
            mobile: "555-0200".into(),
            twitter_id: "@grace".into(),
            people_id: "xyz789".into(),
            ..Default::default()
        },
        Contact {
            id: LINUS_ID,
            name: "Linus Pauling".into(),
            email: "linus@example.com".into(),
            phone: "555-0100".into(),
            external_id: "ext-3".into(),
            ..Default::default()
        },
    ]
}

pub fn service_with(config: &ServerConfig) -> Arc<ContactService> {
    let store = ContactStore::from_seed(seed_contacts());
    Arc::new(ContactService::new(store, config.contacts.clone()))
}

/// Router over the seeded contacts with default configuration.
pub fn app() -> Router {
    app_with(ServerConfig::default())
}

pub fn app_with(config: ServerConfig) -> Router {
    let service = service_with(&config);
    build_router(&config, AppState::new(service))
}

/// A decoded response: status, raw body and the body parsed as JSON (if any).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub json: Option<Value>,
    pub request_id: Option<String>,
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    let json = serde_json::from_slice(&body).ok();

    TestResponse {
        status,
        body,
        json,
        request_id,
    }
}

/// Serve the seeded contacts on an ephemeral port.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = service_with(&config);
    let server = HttpServer::new(config, service);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
