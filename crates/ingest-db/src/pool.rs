//! Pooled SQLite connections for the ledger.

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Per-connection tuning applied when the pool opens a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,

    /// Upper bound on open connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool could not open its first connection.
    #[error("failed to open database pool: {0}")]
    Build(#[from] r2d2::Error),
}

/// Opens a pool over the database at `db_path`, creating the file if needed.
///
/// Each connection gets the configured busy timeout and WAL journaling, so
/// readers proceed while one insert holds the write lock. `:memory:` gives
/// every connection its own empty database; use it only with
/// `pool_max_size = 1`.
///
/// # Errors
///
/// Returns [`PoolError::Build`] if a connection cannot be opened or
/// refuses WAL mode.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(db_path)
        .with_flags(flags)
        .with_init(move |conn| prepare_connection(conn, settings));

    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .build(manager)?;

    tracing::debug!(
        path = db_path,
        max_size = settings.pool_max_size,
        "database pool ready"
    );

    Ok(pool)
}

// The timeout goes first so that connections opened together on a new file
// wait on each other's journal switch instead of failing.
fn prepare_connection(conn: &mut Connection, settings: DbRuntimeSettings) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))?;

    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    match mode.as_str() {
        "wal" | "memory" => Ok(()),
        other => Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some(format!("database refused WAL journaling (mode is {other})")),
        )),
    }
}
