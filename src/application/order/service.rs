//! Order service: the single owner of the cache/store consistency protocol.
//!
//! Reads are cache-aside with read-through population. Saves are
//! write-through with store-first ordering: the cache is updated only after
//! the store accepted the write, so anything visible in the cache was durably
//! committed at some point.
//!
//! Construction starts a background preload and returns immediately.
//! Until [`PreloadStatus::is_settled`] turns true, [`OrderService::get_all_orders`]
//! may return a subset of the store. Point reads are unaffected because misses
//! fall back to the store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::preload::{spawn_preload, PreloadStatus};
use crate::application::cache::OrderCache;
use crate::domain::{Order, OrderError, OrderUid};
use crate::error::Result;
use crate::port::OrderStore;

/// Orchestrates reads and writes of order records.
///
/// Constructed once per process and shared behind an `Arc` by the HTTP layer
/// and the stream ingestor.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    cache: Arc<OrderCache>,
    preload: watch::Receiver<PreloadStatus>,
}

impl OrderService {
    /// Create a service with a fresh cache and start preloading it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self::with_cache(store, Arc::new(OrderCache::new()))
    }

    /// Create a service around an existing cache handle and start preloading it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn with_cache(store: Arc<dyn OrderStore>, cache: Arc<OrderCache>) -> Self {
        let (tx, rx) = watch::channel(PreloadStatus::Pending);
        spawn_preload(Arc::clone(&store), Arc::clone(&cache), tx);
        Self {
            store,
            cache,
            preload: rx,
        }
    }

    /// The cache owned by this service.
    #[must_use]
    pub fn cache(&self) -> &OrderCache {
        &self.cache
    }

    /// Current preload progress.
    #[must_use]
    pub fn preload_status(&self) -> PreloadStatus {
        self.preload.borrow().clone()
    }

    /// Receiver that observes preload progress changes.
    #[must_use]
    pub fn subscribe_preload(&self) -> watch::Receiver<PreloadStatus> {
        self.preload.clone()
    }

    /// Wait until preload has settled and return its outcome.
    pub async fn wait_until_preloaded(&self) -> PreloadStatus {
        let mut rx = self.preload.clone();
        let settled = rx.wait_for(PreloadStatus::is_settled).await.map(|s| s.clone());
        match settled {
            Ok(status) => status,
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Look up an order, consulting the cache before the store.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`] if the store confirms the order is absent
    /// - The store's error if the lookup could not be completed
    pub async fn get_order(&self, uid: &str) -> Result<Order> {
        if let Some(order) = self.cache.get(uid) {
            debug!(order_uid = uid, "Cache hit");
            return Ok(order);
        }

        let uid = OrderUid::new(uid);
        if uid.is_blank() {
            return Err(OrderError::NotFound(uid).into());
        }

        let order = match self.store.get_order(&uid).await {
            Ok(Some(order)) => order,
            Ok(None) => return Err(OrderError::NotFound(uid).into()),
            Err(e) => {
                warn!(order_uid = %uid, error = %e, "Store lookup failed");
                return Err(e);
            }
        };

        // A write-through that landed while we were reading wins.
        if !self.cache.fill(order.clone()) {
            if let Some(cached) = self.cache.get(uid.as_str()) {
                return Ok(cached);
            }
        }
        debug!(order_uid = %uid, "Cache populated from store");
        Ok(order)
    }

    /// Persist an order, then publish it to the cache.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Invalid`] if the order fails validation
    /// - The store's error if the write failed; the cache is left untouched
    pub async fn save_order(&self, order: &Order) -> Result<()> {
        order.validate()?;

        if let Err(e) = self.store.save_order(order).await {
            warn!(order_uid = %order.order_uid, error = %e, "Store write failed");
            return Err(e);
        }

        self.cache.set(order.clone());
        debug!(
            order_uid = %order.order_uid,
            items = order.items.len(),
            "Order saved"
        );
        Ok(())
    }

    /// Snapshot of every cached order. Never touches the store.
    #[must_use]
    pub fn get_all_orders(&self) -> Vec<Order> {
        self.cache.get_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::order;
    use crate::testkit::store::MemoryOrderStore;

    fn service_over(store: &Arc<MemoryOrderStore>) -> OrderService {
        OrderService::new(Arc::clone(store) as Arc<dyn OrderStore>)
    }

    #[tokio::test]
    async fn cache_hit_skips_the_store() {
        let store = Arc::new(MemoryOrderStore::new());
        let service = service_over(&store);
        service.wait_until_preloaded().await;

        service.save_order(&order("a")).await.unwrap();
        let fetched = service.get_order("a").await.unwrap();

        assert_eq!(fetched, order("a"));
        assert_eq!(store.get_calls(), 0);
    }

    #[tokio::test]
    async fn blank_uid_is_not_found_without_store_access() {
        let store = Arc::new(MemoryOrderStore::new());
        let service = service_over(&store);

        let err = service.get_order("  ").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.get_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_order_is_rejected_before_the_store() {
        let store = Arc::new(MemoryOrderStore::new());
        let service = service_over(&store);

        let err = service.save_order(&order("")).await.unwrap_err();

        assert!(err.is_decode_failure());
        assert_eq!(store.save_calls(), 0);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn store_lookup_failure_is_not_reported_as_not_found() {
        let store = Arc::new(MemoryOrderStore::new());
        store.fail_gets(true);
        let service = service_over(&store);

        let err = service.get_order("a").await.unwrap_err();

        assert!(err.is_upstream());
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn preload_status_settles() {
        let store = Arc::new(MemoryOrderStore::seeded([order("a"), order("b")]));
        let service = service_over(&store);

        let status = service.wait_until_preloaded().await;

        assert_eq!(status, PreloadStatus::Complete { loaded: 2 });
        assert!(service.preload_status().is_settled());
    }

    #[tokio::test]
    async fn failed_preload_still_serves_reads() {
        let store = Arc::new(MemoryOrderStore::seeded([order("a")]));
        store.fail_get_all(true);
        let service = service_over(&store);

        let status = service.wait_until_preloaded().await;
        assert!(matches!(status, PreloadStatus::Failed { .. }));
        assert!(service.get_all_orders().is_empty());

        let fetched = service.get_order("a").await.unwrap();
        assert_eq!(fetched, order("a"));
        assert_eq!(service.get_all_orders().len(), 1);
    }

    #[tokio::test]
    async fn save_during_store_lookup_wins_over_read_through() {
        let store = Arc::new(MemoryOrderStore::new());
        let service = Arc::new(service_over(&store));
        service.wait_until_preloaded().await;

        let stale = order("a");
        store.insert_direct(stale.clone());
        let release = store.hold_gets();

        let lookup = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get_order("a").await })
        };
        while store.get_calls() == 0 {
            tokio::task::yield_now().await;
        }

        let mut fresh = stale.clone();
        fresh.track_number = "FRESH".into();
        service.save_order(&fresh).await.unwrap();

        release.notify_one();
        let fetched = lookup.await.unwrap().unwrap();

        assert_eq!(fetched, fresh);
        assert_eq!(service.cache().get("a"), Some(fresh));
    }

    #[tokio::test]
    async fn preload_subscribers_see_the_settled_status() {
        let (store, gate) = MemoryOrderStore::seeded([order("a")]).with_preload_gate();
        let service = OrderService::new(Arc::new(store) as Arc<dyn OrderStore>);
        let mut status = service.subscribe_preload();
        assert_eq!(*status.borrow_and_update(), PreloadStatus::Pending);

        gate.send(()).unwrap();
        status.changed().await.unwrap();

        assert_eq!(*status.borrow(), PreloadStatus::Complete { loaded: 1 });
    }
}
