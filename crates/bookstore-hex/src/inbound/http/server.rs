use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::{Json, Router};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::errors::AppError;
use bookstore_types::domain::connection::ConnectionState;
use bookstore_types::ports::store::StoreConnection;

/// Largest JSON body the API accepts.
const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// Assemble the application router around a store handle and an externally
/// supplied API router.
///
/// The stage order is load-bearing: the permissive CORS layer and the JSON
/// body limit sit outermost, the trace layer wraps every route, then come
/// the static `/covers` service and the merged API routes, and finally the
/// terminal error stage (the JSON not-found fallback plus `AppError`'s
/// response mapping), which observes errors from everything before it.
pub fn build_router<S>(store: Arc<S>, covers_dir: &Path, api: Router<Arc<S>>) -> Router
where
    S: StoreConnection,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri
            )
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    Router::new()
        .route("/health", get(health::<S>))
        .merge(api)
        .nest_service("/covers", ServeDir::new(covers_dir))
        .fallback(not_found)
        .layer(trace_layer)
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// Liveness plus persistence readiness in one place: reports ok only once
/// the connection handle is established and answering pings.
async fn health<S>(
    State(store): State<Arc<S>>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: StoreConnection,
{
    match store.state() {
        ConnectionState::Connected => {
            store
                .ping()
                .await
                .map_err(|e| AppError::Unavailable(e.to_string()))?;
            Ok(Json(serde_json::json!({ "status": "ok" })))
        }
        state => Err(AppError::Unavailable(format!("store is {state}"))),
    }
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("no route for {uri}"))
}
