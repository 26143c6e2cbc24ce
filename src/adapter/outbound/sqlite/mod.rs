//! SQLite persistence adapter.
//!
//! Provides the Diesel-backed [`OrderStore`](crate::port::OrderStore)
//! implementation along with pooling and migrations.

pub mod database;
pub mod store;

pub use database::connection::{create_pool, pending_migrations, run_migrations, DbPool};
pub use store::SqliteOrderStore;
