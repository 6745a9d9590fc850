//! Event store for the ingestion ledger.
//!
//! Owns the single persisted entity, [`Event`]: an immutable record of an
//! id, a receive timestamp, an optional source label, and an opaque JSON
//! object payload. The store never interprets payload contents beyond the
//! exact-match helpers used by lookups; there is no update or delete path.
//!
//! # Operations
//!
//! | Operation | Function |
//! |-----------|----------|
//! | Insert | [`insert_event`] |
//! | List most recent first | [`list_recent`] with a [`Page`] |
//! | Lookup by id | [`get_event`] |
//! | Scan for the newest match | [`find_latest`], [`find_by_stid_exnum`] |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ingest_events::{insert_event, list_recent, Page};
//!
//! let payload = serde_json::json!({"stid": "st1", "exnum": "EX1", "table": {}});
//! let event = insert_event(&conn, Some("s1"), payload.as_object().unwrap())?;
//! let recent = list_recent(&conn, Page::clamped(Some(10), None))?;
//! ```
//!
//! # Timestamps
//!
//! `received_at` is taken from the SQLite clock inside the insert statement,
//! so within one database writer it never decreases as ids increase. Several
//! processes with skewed clocks sharing one database file can break that
//! ordering; ids remain the authoritative order.

mod error;
mod event;
mod page;
mod store;

pub use error::StoreError;
pub use event::Event;
pub use page::{Page, DEFAULT_LIMIT, MAX_LIMIT};
pub use store::{
    count_events, find_by_stid_exnum, find_latest, get_event, insert_event, list_recent,
};
