//! End-to-end tests against a live listener.

use std::time::Duration;

use serde_json::{json, Value};

use staledesk::config::ServerConfig;

mod common;

use common::{start_server, ADA_ID};

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_crud_round_over_http() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let base = format!("http://{addr}/api/v2");
    let client = client();

    let res = client
        .post(format!("{base}/contacts"))
        .json(&json!({ "name": "Barbara Liskov", "email": "barbara@example.com" }))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();

    let res = client
        .put(format!("{base}/contacts/{id}"))
        .json(&json!({ "job_title": "Professor" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["job_title"], "Professor");
    assert_eq!(updated["email"], "barbara@example.com");

    let res = client.delete(format!("{base}/contacts/{id}")).send().await.unwrap();
    assert_eq!(res.status(), 204);

    let res = client.get(format!("{base}/contacts/{id}")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_search_query_encoding() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let client = client();

    let res = client
        .get(format!("http://{addr}/api/v2/search/contacts"))
        .query(&[("query", "\"people_id:'abc123'\"")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["id"], ADA_ID);

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let client = client();
    let url = format!("http://{addr}/api/v2/contacts");

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "name": format!("Contact {i}"), "email": "same@example.com" }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap().as_u16() {
            201 => created += 1,
            400 => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1, "uniqueness must hold under concurrent writers");
    assert_eq!(rejected, 19);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let (addr, shutdown) = start_server(ServerConfig::default()).await;
    let client = client();

    let res = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(client.get(format!("http://{addr}/health")).send().await.is_err());
}
