//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, per-connection pragmas, and embedded
//! migrations for the SQLite order database.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const POOL_SIZE: u32 = 5;

/// Applies [`configure_sqlite_connection`] to every pooled connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        configure_sqlite_connection(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database path.
///
/// # Errors
/// Returns [`Error::Connection`] if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(POOL_SIZE)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations and return how many were applied.
///
/// # Errors
/// Returns an error if a connection cannot be checked out or a migration fails.
pub fn run_migrations(pool: &DbPool) -> Result<usize> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "Applied database migrations");
    }
    Ok(applied.len())
}

/// Number of embedded migrations not yet applied.
///
/// # Errors
/// Returns an error if a connection cannot be checked out or the migration
/// table cannot be read.
pub fn pending_migrations(pool: &DbPool) -> Result<usize> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.pending_migrations(MIGRATIONS)
        .map(|pending| pending.len())
        .map_err(|e| Error::Database(e.to_string()))
}

/// Configure SQLite pragmas for concurrent readers and a single writer.
///
/// Foreign keys stay off: `REPLACE INTO` on the order header would otherwise
/// cascade-fail against the delivery and payment rows that reference it.
///
/// # Errors
/// Returns the Diesel error if a pragma fails to apply.
pub fn configure_sqlite_connection(conn: &mut SqliteConnection) -> diesel::QueryResult<()> {
    conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
}
