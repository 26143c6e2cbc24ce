//! Runtime caches used by application services.
//!
//! - [`order::OrderCache`]: Process-local order records keyed by identifier

pub mod order;

pub use order::OrderCache;
