//! WebSocket order feed.
//!
//! - [`feed`] - [`WebSocketFeed`], a single-connection [`MessageFeed`](crate::port::MessageFeed)
//! - [`reconnecting`] - [`ReconnectingFeed`], backoff and reconnect around any feed
//! - [`message`] - Control frames sent to the broker

pub mod feed;
pub mod message;
pub mod reconnecting;

pub use feed::WebSocketFeed;
pub use reconnecting::ReconnectingFeed;
