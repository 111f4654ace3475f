use axum::Router;
use bookstore_hex::bootstrap::ServiceContext;
use bookstore_hex::config::Config;
use bookstore_store::{build_store, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for ATLAS_USER_NAME / ATLAS_PASSWORD / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = Config::from_env()?;
    let store: Store = build_store(Some(&config.connection_uri()))?;

    // Route modules plug in here; the bootstrap itself only mounts
    // /health and the /covers static service.
    let api = Router::new();

    let context = ServiceContext::new(&config, store, api)?;

    // A database connection error surfaces here and exits with status 1.
    context.run().await
}
