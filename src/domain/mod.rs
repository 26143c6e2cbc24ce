//! Transport- and storage-agnostic order types.
//!
//! - [`order`] - The order aggregate (order, delivery, payment, items)
//! - [`id`] - The [`OrderUid`] key
//! - [`error`] - Aggregate validation and lookup errors

pub mod error;
pub mod id;
pub mod order;

pub use error::OrderError;
pub use id::OrderUid;
pub use order::{Delivery, Item, Order, Payment};
