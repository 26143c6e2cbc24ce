//! SQLite database modules.
//!
//! Provides connection pooling, embedded migrations, schema definitions, and
//! Diesel row types for the order tables.

pub mod connection;
pub mod model;
pub mod schema;
