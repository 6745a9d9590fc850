//! Persistence operations for the event ledger.
//!
//! All writes go through [`insert_event`], which assigns the id and the
//! receive timestamp inside a single `INSERT ... RETURNING` statement, so a
//! row is either fully visible to readers or not present at all.
//!
//! Reads never cache: every call re-queries the `events` table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::event::Event;
use crate::page::Page;

const SELECT_COLUMNS: &str = "SELECT id, received_at, source, payload FROM events";

/// Raw column values, decoded into an [`Event`] outside the row closure so
/// payload errors keep their own variant.
type RawRow = (i64, String, Option<String>, String);

fn read_raw(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode((id, received_at, source, payload_json): RawRow) -> Result<Event, StoreError> {
    match serde_json::from_str::<Value>(&payload_json)? {
        Value::Object(payload) => Ok(Event {
            id,
            received_at,
            source,
            payload,
        }),
        _ => Err(StoreError::CorruptPayload { id }),
    }
}

/// Writes a single event to the ledger and returns it fully populated.
///
/// The id comes from the table's `AUTOINCREMENT` sequence and the timestamp
/// from SQLite's clock, both evaluated under the write lock.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure (including a `source` over
/// 200 characters, which violates the table constraint) or
/// `StoreError::Serialization` if the payload cannot be serialised.
pub fn insert_event(
    conn: &Connection,
    source: Option<&str>,
    payload: &Map<String, Value>,
) -> Result<Event, StoreError> {
    let payload_json = serde_json::to_string(payload)?;

    let (id, received_at): (i64, String) = conn.query_row(
        "INSERT INTO events (received_at, source, payload)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), ?1, ?2)
         RETURNING id, received_at",
        params![source, payload_json],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    tracing::debug!(id, "event row inserted");

    Ok(Event {
        id,
        received_at,
        source: source.map(str::to_owned),
        payload: payload.clone(),
    })
}

/// Returns up to `page.limit` events, newest first, after skipping the
/// `page.offset` most recent ones.
///
/// Callers are expected to build `page` with [`Page::clamped`]. An empty
/// result is not an error.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure or
/// `StoreError::CorruptPayload` if a stored payload is not an object.
pub fn list_recent(conn: &Connection, page: Page) -> Result<Vec<Event>, StoreError> {
    let sql = format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT ?1 OFFSET ?2");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![page.limit, page.offset], read_raw)?;

    let mut events = Vec::new();
    for row in rows {
        events.push(decode(row?)?);
    }

    Ok(events)
}

/// Looks up a single event by id.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn get_event(conn: &Connection, id: i64) -> Result<Option<Event>, StoreError> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
    conn.query_row(&sql, params![id], read_raw)
        .optional()?
        .map(decode)
        .transpose()
}

/// Scans every event newest first and returns the first one accepted by
/// `predicate`.
///
/// This is a full table scan with no index over payload contents; cost is
/// linear in the number of stored events.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure or
/// `StoreError::CorruptPayload` if a row scanned before the match has a
/// payload that is not an object.
pub fn find_latest<F>(conn: &Connection, mut predicate: F) -> Result<Option<Event>, StoreError>
where
    F: FnMut(&Event) -> bool,
{
    let sql = format!("{SELECT_COLUMNS} ORDER BY id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let event = decode(read_raw(row)?)?;
        if predicate(&event) {
            return Ok(Some(event));
        }
    }

    Ok(None)
}

/// Returns the most recent event whose payload `stid` and `exnum` fields are
/// strings equal to the given values.
///
/// # Errors
///
/// See [`find_latest`].
pub fn find_by_stid_exnum(
    conn: &Connection,
    stid: &str,
    exnum: &str,
) -> Result<Option<Event>, StoreError> {
    find_latest(conn, |event| {
        event.payload_str_eq("stid", stid) && event.payload_str_eq("exnum", exnum)
    })
}

/// Returns the number of stored events.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn count_events(conn: &Connection) -> Result<i64, StoreError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?)
}
