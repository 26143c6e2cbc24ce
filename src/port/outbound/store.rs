//! Persistence port for order aggregates.

use async_trait::async_trait;

use crate::domain::{Order, OrderUid};
use crate::error::Result;

/// Durable storage for order aggregates.
///
/// The store is the source of truth; the in-memory cache is rebuilt from it.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert or replace the full aggregate keyed by `order_uid`.
    ///
    /// Delivery, payment and items are replaced as one unit. Repeating the
    /// same write has no additional effect.
    async fn save_order(&self, order: &Order) -> Result<()>;

    /// Point lookup. `Ok(None)` means the order is absent; `Err` means the
    /// store could not answer.
    async fn get_order(&self, uid: &OrderUid) -> Result<Option<Order>>;

    /// Enumerate every order. Used to warm the cache at startup.
    async fn get_all_orders(&self) -> Result<Vec<Order>>;
}
