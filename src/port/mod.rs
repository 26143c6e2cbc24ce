//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! Adapters implement them to integrate with the durable store and the
//! message transport.
//!
//! ```text
//!   ┌──────────────┐      ┌─────────────────────────┐      ┌──────────────┐
//!   │  WebSocket   │─────▶│      Application        │─────▶│   SQLite     │
//!   │ feed adapter │ Feed │ OrderService + Cache    │Store │ store adapter│
//!   └──────────────┘      └─────────────────────────┘      └──────────────┘
//!                                     ▲
//!                                     │
//!                              ┌──────────────┐
//!                              │  HTTP (axum) │
//!                              └──────────────┘
//! ```

pub mod outbound;

pub use outbound::feed::{FeedMessage, MessageFeed};
pub use outbound::store::OrderStore;
