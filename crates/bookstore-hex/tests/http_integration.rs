use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use bookstore_hex::bootstrap::ServiceContext;
use bookstore_hex::config::Config;
use bookstore_hex::errors::AppError;
use bookstore_store::memory::MemoryStore;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn test_config(port: u16, covers_dir: &std::path::Path) -> Config {
    Config {
        atlas_user_name: "u1".into(),
        atlas_password: "p1".into(),
        server_port: port.to_string(),
        covers_dir: covers_dir.display().to_string(),
    }
}

#[tokio::test]
async fn covers_and_health_over_http() {
    let port = find_free_port();
    let covers = tempfile::tempdir().unwrap();
    let cover_bytes = b"jpeg bytes for a cover".to_vec();
    std::fs::write(covers.path().join("dune.jpg"), &cover_bytes).unwrap();

    let config = test_config(port, covers.path());
    let store = MemoryStore::new();
    let observer = store.clone();
    let context = ServiceContext::new(&config, store, Router::new()).unwrap();

    let addr = format!("http://127.0.0.1:{}", port);
    let handle = tokio::spawn(async move {
        context.run().await.expect("server run");
    });

    // Give the server a moment to start and the handshake to resolve.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/covers/dune.jpg", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().to_vec(), cover_bytes);

    let res = client
        .get(format!("{}/covers/missing.jpg", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let res = client.get(format!("{}/health", addr)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // The bootstrap made exactly one connection attempt.
    assert_eq!(observer.attempts(), 1);

    handle.abort();
}

#[tokio::test]
async fn router_errors_reach_the_terminal_stage() {
    async fn boom() -> Result<(), AppError> {
        Err(AppError::Internal(anyhow::anyhow!("exploded")))
    }

    let port = find_free_port();
    let covers = tempfile::tempdir().unwrap();
    let config = test_config(port, covers.path());

    let api: Router<Arc<MemoryStore>> = Router::new().route("/boom", get(boom));
    let context = ServiceContext::new(&config, MemoryStore::new(), api).unwrap();

    let addr = format!("http://127.0.0.1:{}", port);
    let handle = tokio::spawn(async move {
        context.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();

    // An error raised inside a mounted route is rendered by the terminal
    // error stage as the JSON error body.
    let res = client.get(format!("{}/boom", addr)).send().await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "internal error");

    // Unmatched paths fall through to the JSON not-found fallback.
    let res = client
        .get(format!("{}/no/such/route", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("no route"));

    handle.abort();
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let port = find_free_port();
    let covers = tempfile::tempdir().unwrap();
    let config = test_config(port, covers.path());
    let context = ServiceContext::new(&config, MemoryStore::new(), Router::new()).unwrap();

    let addr = format!("http://127.0.0.1:{}", port);
    let handle = tokio::spawn(async move {
        context.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", addr))
        .header("origin", "http://shop.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    handle.abort();
}
