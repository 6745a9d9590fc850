//! Ingestion ledger HTTP gateway.
//!
//! Translates HTTP requests into event store operations: authenticates with
//! a shared API key, validates request shape, and maps store results and
//! errors to JSON responses.

pub mod api;
pub mod api_events;
pub mod config;
pub mod middleware;
pub mod validation;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use ingest_db::DbPool;
use middleware::ApiKey;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
///
/// Built once at startup; nothing in it is re-read from the environment per
/// request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// The credential every `/v1` request must present.
    pub api_key: ApiKey,
}

impl AppState {
    pub fn new(pool: DbPool, api_key: ApiKey) -> Self {
        Self { pool, api_key }
    }
}

/// Maximum request body size (2 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Health check handler. Does not touch the database.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/v1/events",
            post(api_events::create_event_handler).get(api_events::list_events_handler),
        )
        // Static segment; takes priority over `{id}` below.
        .route("/v1/events/latest", get(api_events::latest_event_handler))
        .route("/v1/events/{id}", get(api_events::get_event_handler))
        .route_layer(axum::middleware::from_fn(middleware::api_key_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
