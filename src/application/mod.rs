//! Application services (use cases).
//!
//! These services own the consistency protocol between the in-memory cache
//! and the durable store, and coordinate the inbound adapters that feed it.
//!
//! - [`cache`] - The process-local [`OrderCache`](cache::OrderCache)
//! - [`order`] - [`OrderService`](order::OrderService): cache-aside reads,
//!   write-through saves, background preload
//! - [`ingest`] - [`StreamIngestor`](ingest::StreamIngestor): feed consumer loop

pub mod cache;
pub mod ingest;
pub mod order;
