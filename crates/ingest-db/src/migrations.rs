//! Versioned schema for the ledger database.
//!
//! The schema is an ordered list of SQL scripts compiled into the crate.
//! [`run_migrations`] brings a database up to date by applying, in order,
//! every script whose name is not yet recorded in `_ingest_migrations`.

use std::collections::HashSet;

use rusqlite::Connection;
use thiserror::Error;

const TRACKING_TABLE_SQL: &str = include_str!("migrations/000_init.sql");

struct Migration {
    name: &'static str,
    sql: &'static str,
}

/// Append only; a released name must never change.
const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "000_init",
        sql: TRACKING_TABLE_SQL,
    },
    Migration {
        name: "001_events",
        sql: include_str!("migrations/001_events.sql"),
    },
];

/// Failure to bring the schema up to date.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A script, or the row recording it, could not be written. Nothing from
    /// that script is left behind.
    #[error("migration '{name}' failed: {source}")]
    Apply {
        name: &'static str,
        source: rusqlite::Error,
    },

    /// The tracking table could not be created or read.
    #[error("failed to read applied migrations: {0}")]
    Tracking(#[source] rusqlite::Error),
}

/// Applies every pending migration and returns how many ran.
///
/// Safe to call on every startup; an up-to-date database applies `0`.
///
/// # Errors
///
/// Stops at the first failing script and returns [`MigrationError::Apply`];
/// scripts before it stay applied.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    apply_pending(conn, MIGRATIONS)
}

fn apply_pending(conn: &Connection, migrations: &[Migration]) -> Result<usize, MigrationError> {
    conn.execute_batch(TRACKING_TABLE_SQL)
        .map_err(MigrationError::Tracking)?;
    let done = applied_names(conn).map_err(MigrationError::Tracking)?;

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| !done.contains(migration.name))
        .collect();

    if pending.is_empty() {
        tracing::debug!(known = done.len(), "schema is current");
    }

    for migration in &pending {
        apply(conn, migration).map_err(|source| MigrationError::Apply {
            name: migration.name,
            source,
        })?;
        tracing::info!(migration = migration.name, "applied migration");
    }

    Ok(pending.len())
}

fn applied_names(conn: &Connection) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM _ingest_migrations")?;
    let names = stmt.query_map([], |row| row.get(0))?.collect();
    names
}

// Script and tracking row share one transaction.
fn apply(conn: &Connection, migration: &Migration) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO _ingest_migrations (name) VALUES (?1)",
        [migration.name],
    )?;
    tx.commit()
}
