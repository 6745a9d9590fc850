//! Database layer for the ingestion ledger.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! and embedded SQL migrations. The `events` table and its constraints are
//! created through versioned migrations managed by this crate.
//!
//! SQLite in WAL mode allows concurrent readers with a single writer, and
//! the writer lock is what serialises id assignment across concurrent
//! inserts. Migrations are compiled into the binary via `include_str!`.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
