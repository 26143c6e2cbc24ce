//! Domain errors for the order aggregate.
//!
//! [`OrderError`] separates a confirmed absence from a record that violates
//! the aggregate's invariants. Store and transport failures live in the
//! crate-level [`Error`](crate::error::Error) instead.

use thiserror::Error;

use super::id::OrderUid;

/// Errors raised by order lookups and aggregate validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The order is absent from both the cache and the store.
    #[error("order not found: {0}")]
    NotFound(OrderUid),

    /// The record violates an aggregate invariant.
    #[error("invalid order: {reason}")]
    Invalid {
        /// Which invariant failed.
        reason: String,
    },
}

impl OrderError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
