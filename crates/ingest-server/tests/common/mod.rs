//! Shared harness for gateway integration tests.
//!
//! Each test gets its own SQLite file in a temporary directory so pooled
//! connections all see the same database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use ingest_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use ingest_server::{app, middleware::ApiKey, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key-12345";

pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    _dir: TempDir,
}

pub fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("ledger.db");
    let pool = create_pool(
        path.to_str().expect("utf-8 temp path"),
        DbRuntimeSettings {
            busy_timeout_ms: 5_000,
            pool_max_size: 4,
        },
    )
    .expect("failed to create pool");
    {
        let conn = pool.get().expect("failed to get connection");
        run_migrations(&conn).expect("failed to run migrations");
    }

    let state = AppState::new(pool.clone(), ApiKey::new(TEST_API_KEY));
    TestApp {
        router: app(state),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    /// Sends a request and returns the status with the body parsed as JSON.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    /// Creates an event through the API and returns the response body.
    pub async fn create(&self, body: Value) -> Value {
        let (status, created) = self.send(post_event(&body)).await;
        assert_eq!(status, StatusCode::OK, "create failed: {created}");
        created
    }

    /// Creates `n` events with sources `source-{i}`, stids `station-{i}` and
    /// exnums `EX{i:03}`.
    pub async fn seed(&self, n: usize) -> Vec<Value> {
        let mut created = Vec::with_capacity(n);
        for i in 0..n {
            created.push(
                self.create(json!({
                    "source": format!("source-{i}"),
                    "payload": {
                        "stid": format!("station-{i}"),
                        "exnum": format!("EX{i:03}"),
                        "table": {"index": i}
                    }
                }))
                .await,
            );
        }
        created
    }

    pub fn stored_count(&self) -> i64 {
        let conn = self.pool.get().unwrap();
        ingest_events::count_events(&conn).unwrap()
    }
}

pub fn sample_event() -> Value {
    json!({
        "source": "test-source",
        "payload": {
            "stid": "station-123",
            "exnum": "EX001",
            "table": {"column1": "value1", "column2": "value2"}
        }
    })
}

pub fn post_event(body: &Value) -> Request<Body> {
    post_raw(body.to_string(), Some(TEST_API_KEY))
}

pub fn post_raw(body: String, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/events")
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    get_with_key(uri, Some(TEST_API_KEY))
}

pub fn get_with_key(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn ids(events: &Value) -> Vec<i64> {
    events
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|e| e["id"].as_i64().expect("id should be an integer"))
        .collect()
}
