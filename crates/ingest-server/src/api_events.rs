//! Event ingestion and read-back handlers.
//!
//! Provides:
//! - `POST /v1/events`: validate and store one event
//! - `GET /v1/events`: newest-first page of events
//! - `GET /v1/events/{id}?exnum=`: single event, only if `exnum` matches
//! - `GET /v1/events/latest?stid=&exnum=`: newest event matching both keys
//!
//! All routes here sit behind [`api_key_middleware`](crate::middleware::api_key_middleware).

use crate::api::ApiError;
use crate::validation::{check_source, first_missing_key, QueryParams, REQUIRED_PAYLOAD_KEYS};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    Json,
};
use ingest_events::{Event, Page, StoreError};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Request body for `POST /v1/events`.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Optional label for where the event came from.
    #[serde(default)]
    pub source: Option<String>,
    /// Must be a JSON object; checked by the handler so a wrong type gets a
    /// specific message.
    pub payload: Value,
}

/// Runs a store operation on a pooled connection off the async runtime.
async fn with_conn<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
        let conn = pool.get()?;
        Ok(op(&*conn)?)
    })
    .await
    .map_err(|e| ApiError::Storage(format!("task join error: {e}")))?
}

/// Query strings are read as raw pairs so that repeated names resolve to
/// their last value and integers can saturate instead of failing.
type RawQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn query_params(query: RawQuery) -> Result<QueryParams, ApiError> {
    let Query(pairs) =
        query.map_err(|rejection| ApiError::UnprocessableInput(rejection.body_text()))?;
    Ok(pairs.into_iter().collect())
}

fn body_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn payload_not_object() -> ApiError {
    ApiError::BadRequest("payload must be a JSON object".to_string())
}

/// Handler for `POST /v1/events`.
///
/// Checks run in a fixed order and all precede the write: body size (413),
/// body shape (400), `source` length (422), then the required payload keys
/// `stid`, `exnum`, `table` (422 naming the first one missing).
pub async fn create_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(CreateEventRequest { source, payload }) = body.map_err(body_rejection)?;

    if !payload.is_object() {
        return Err(payload_not_object());
    }

    check_source(source.as_deref())?;

    if let Some(key) = first_missing_key(&payload, &REQUIRED_PAYLOAD_KEYS) {
        return Err(ApiError::UnprocessableInput(format!(
            "payload must include '{key}'"
        )));
    }

    let Value::Object(payload) = payload else {
        return Err(payload_not_object());
    };

    let event = with_conn(&state, move |conn| {
        ingest_events::insert_event(conn, source.as_deref(), &payload)
    })
    .await?;

    tracing::info!(id = event.id, source = ?event.source, "event ingested");

    Ok(Json(event))
}

/// Handler for `GET /v1/events`.
///
/// `limit` defaults to 50 and is clamped to `1..=200`; `offset` defaults to
/// 0 and is floored at 0. Out-of-range values, including ones beyond `i64`,
/// are clamped silently; only values that are not integers are rejected.
pub async fn list_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: RawQuery,
) -> Result<Json<Vec<Event>>, ApiError> {
    let params = query_params(query)?;

    let page = Page::clamped(params.integer("limit")?, params.integer("offset")?);
    let events = with_conn(&state, move |conn| ingest_events::list_recent(conn, page)).await?;

    tracing::debug!(
        limit = page.limit,
        offset = page.offset,
        returned = events.len(),
        "listed events"
    );

    Ok(Json(events))
}

/// Handler for `GET /v1/events/{id}?exnum=`.
///
/// Responds `404` both when the id does not exist and when it exists with a
/// different (or missing) payload `exnum`, with identical bodies, so callers
/// without the right `exnum` cannot probe which ids exist.
pub async fn get_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    query: RawQuery,
) -> Result<Json<Event>, ApiError> {
    let Path(id) = id.map_err(|rejection| ApiError::UnprocessableInput(rejection.body_text()))?;
    let exnum = query_params(query)?.required("exnum")?;

    let event = with_conn(&state, move |conn| ingest_events::get_event(conn, id)).await?;

    match event {
        Some(event) if event.payload_str_eq("exnum", &exnum) => Ok(Json(event)),
        _ => Err(ApiError::NotFound),
    }
}

/// Handler for `GET /v1/events/latest?stid=&exnum=`.
///
/// Scans the whole ledger newest first; cost grows with the number of
/// stored events.
pub async fn latest_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: RawQuery,
) -> Result<Json<Event>, ApiError> {
    let params = query_params(query)?;
    let stid = params.required("stid")?;
    let exnum = params.required("exnum")?;

    with_conn(&state, move |conn| {
        ingest_events::find_by_stid_exnum(conn, &stid, &exnum)
    })
    .await?
    .map(Json)
    .ok_or(ApiError::NotFound)
}
