//! Thread-safe, unbounded order cache.
//!
//! Readers share the lock; writers take it exclusively for the duration of a
//! single map mutation. No lock is ever held across an `.await` or I/O.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;

use crate::domain::{Order, OrderUid};
use crate::error::Result;

/// Process-local mapping from order identifier to order record.
///
/// The cache stores owned copies: values passed in are moved into the map and
/// values handed out are clones, so callers can never mutate cached state.
#[derive(Debug, Default)]
pub struct OrderCache {
    orders: RwLock<HashMap<OrderUid, Order>>,
}

impl OrderCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace the entry for `order.order_uid`.
    pub fn set(&self, order: Order) {
        let uid = order.order_uid.clone();
        self.orders.write().insert(uid, order);
    }

    /// Insert the entry only if the identifier is not cached yet.
    ///
    /// Returns `true` if the order was inserted. Used by read-through
    /// population and preload so a value read from the store before a
    /// concurrent write-through cannot overwrite the newer cached value.
    pub fn fill(&self, order: Order) -> bool {
        let mut orders = self.orders.write();
        if orders.contains_key(order.order_uid.as_str()) {
            return false;
        }
        orders.insert(order.order_uid.clone(), order);
        true
    }

    /// Get a copy of the cached order. `None` is a plain cache miss.
    #[must_use]
    pub fn get(&self, uid: &str) -> Option<Order> {
        self.orders.read().get(uid).cloned()
    }

    /// Snapshot of every cached order, in no particular order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    /// Warm the cache from `loader`.
    ///
    /// Each loaded order is inserted with [`fill`](Self::fill), one lock
    /// acquisition per entry, so readers are not starved during a large
    /// preload. Returns the number of orders inserted.
    ///
    /// # Errors
    ///
    /// Returns the loader's error. Entries inserted before the failure stay
    /// cached; a partially warmed cache is preferred over an empty one.
    pub async fn preload<F, Fut>(&self, loader: F) -> Result<usize>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Order>>>,
    {
        let orders = loader().await?;
        let mut inserted = 0;
        for order in orders {
            if self.fill(order) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// True if the identifier is cached.
    #[must_use]
    pub fn contains(&self, uid: &str) -> bool {
        self.orders.read().contains_key(uid)
    }

    /// Number of cached orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
