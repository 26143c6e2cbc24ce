//! In-memory [`OrderStore`] for service and ingestion tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};

use crate::domain::{Order, OrderUid};
use crate::error::{Error, Result};
use crate::port::OrderStore;

/// Counting in-memory store with failure injection.
///
/// Every trait call is counted, even when it fails. Failures are reported as
/// [`Error::Database`], the way the SQLite adapter reports query errors.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<OrderUid, Order>>,
    save_calls: AtomicUsize,
    get_calls: AtomicUsize,
    get_all_calls: AtomicUsize,
    fail_saves: AtomicBool,
    fail_gets: AtomicBool,
    fail_get_all: AtomicBool,
    get_limit: Mutex<Option<usize>>,
    preload_gate: Mutex<Option<oneshot::Receiver<()>>>,
    save_gate: Mutex<Option<Arc<Notify>>>,
    get_gate: Mutex<Option<Arc<Notify>>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already contains `orders`.
    pub fn seeded(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::new();
        for order in orders {
            store.insert_direct(order);
        }
        store
    }

    /// Hold `get_all_orders` until the returned sender fires (or is dropped).
    #[must_use]
    pub fn with_preload_gate(self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        *self.preload_gate.lock() = Some(rx);
        (self, tx)
    }

    /// Park every `save_order` until the returned handle is notified, once
    /// per save. The write lands after the release.
    pub fn hold_saves(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.save_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Park every `get_order` until the returned handle is notified, once per
    /// lookup. The stored value is read before parking, so a lookup returns
    /// what the store held when it was called.
    pub fn hold_gets(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.get_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_get_all(&self, fail: bool) {
        self.fail_get_all.store(fail, Ordering::SeqCst);
    }

    /// Fail every `get_order` call after the first `limit`.
    pub fn limit_gets(&self, limit: usize) {
        *self.get_limit.lock() = Some(limit);
    }

    /// Write straight into the store, bypassing any service.
    pub fn insert_direct(&self, order: Order) {
        self.orders.lock().insert(order.order_uid.clone(), order);
    }

    #[must_use]
    pub fn stored(&self, uid: &str) -> Option<Order> {
        self.orders.lock().get(uid).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_all_calls(&self) -> usize {
        self.get_all_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn save_order(&self, order: &Order) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Database("injected save failure".into()));
        }
        let gate = self.save_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.insert_direct(order.clone());
        Ok(())
    }

    async fn get_order(&self, uid: &OrderUid) -> Result<Option<Order>> {
        let call = self.get_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(Error::Database("injected lookup failure".into()));
        }
        if let Some(limit) = *self.get_limit.lock() {
            if call > limit {
                return Err(Error::Database(format!(
                    "unexpected lookup #{call} for {uid}"
                )));
            }
        }
        let found = self.stored(uid.as_str());
        let gate = self.get_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(found)
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.preload_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.fail_get_all.load(Ordering::SeqCst) {
            return Err(Error::Database("injected enumeration failure".into()));
        }
        Ok(self.orders.lock().values().cloned().collect())
    }
}
