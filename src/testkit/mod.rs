//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for sample orders and their JSON documents.
//! - [`store`] - [`MemoryOrderStore`](store::MemoryOrderStore): counting
//!   in-memory store with failure injection and a preload gate.
//! - [`feed`] - Mock [`MessageFeed`](crate::port::MessageFeed) implementations:
//!   `ScriptedFeed` and `ChannelFeed`.

pub mod domain;
pub mod feed;
pub mod store;
