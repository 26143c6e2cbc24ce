//! Orderbridge - order ingestion with a write-through cache over SQLite.
//!
//! Orders arrive as JSON documents from a WebSocket feed or the HTTP API, are
//! persisted to SQLite, and are served from an in-memory cache that is warmed
//! from the database at startup.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - The order aggregate and its identifier
//! - **`port`** - Traits the application depends on (`OrderStore`, `MessageFeed`)
//! - **`application`** - The cache, the order service and the stream ingestor
//! - **`adapter`** - SQLite store, WebSocket feed, HTTP API and CLI
//! - **`infrastructure`** - Configuration and process orchestration
//!
//! # Consistency
//!
//! [`application::order::OrderService`] is the only writer. Saves go to the
//! store first and reach the cache only after the store accepted them. Reads
//! check the cache first and fill it from the store on a miss.
//!
//! # Features
//!
//! - `testkit` - In-memory store and scripted feeds for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use orderbridge::application::order::OrderService;
//! use orderbridge::infrastructure::orchestration::open_store;
//!
//! # async fn demo() -> orderbridge::error::Result<()> {
//! let store = Arc::new(open_store("orderbridge.db")?);
//! let service = OrderService::new(store);
//! service.wait_until_preloaded().await;
//! let order = service.get_order("b563feb7b2b84b6test").await?;
//! println!("{}", order.track_number);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
