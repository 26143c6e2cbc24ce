//! Consistency contract between the order cache and the record store.

use std::collections::HashSet;
use std::sync::Arc;

use orderbridge::application::order::{OrderService, PreloadStatus};
use orderbridge::domain::Order;
use orderbridge::port::OrderStore;
use orderbridge::testkit::domain::{order, order_with_items};
use orderbridge::testkit::store::MemoryOrderStore;

fn service_over(store: &Arc<MemoryOrderStore>) -> OrderService {
    OrderService::new(Arc::clone(store) as Arc<dyn OrderStore>)
}

fn uids(orders: &[Order]) -> HashSet<String> {
    orders.iter().map(|o| o.order_uid.to_string()).collect()
}

#[tokio::test]
async fn read_through_populates_the_cache() {
    let store = Arc::new(MemoryOrderStore::new());
    let service = service_over(&store);
    service.wait_until_preloaded().await;

    store.insert_direct(order("late"));
    // Any second lookup would fail.
    store.limit_gets(1);

    let first = service.get_order("late").await.unwrap();
    let second = service.get_order("late").await.unwrap();

    assert_eq!(first, order("late"));
    assert_eq!(second, first);
    assert_eq!(store.get_calls(), 1);
    assert!(service.cache().contains("late"));
}

#[tokio::test]
async fn failed_store_write_leaves_cache_unchanged() {
    let store = Arc::new(MemoryOrderStore::new());
    let service = service_over(&store);
    service.wait_until_preloaded().await;

    let original = order("a");
    service.save_order(&original).await.unwrap();
    let before = service.get_all_orders();

    store.fail_saves(true);
    let mut changed = original.clone();
    changed.track_number = "CHANGED".into();
    changed.items.clear();

    let err = service.save_order(&changed).await.unwrap_err();
    assert!(err.is_upstream());

    let err = service.save_order(&order("fresh")).await.unwrap_err();
    assert!(err.is_upstream());

    assert_eq!(service.get_all_orders(), before);
    assert_eq!(service.cache().get("a"), Some(original));
    assert!(!service.cache().contains("fresh"));
}

#[tokio::test]
async fn saving_the_same_record_twice_keeps_one_entry() {
    let store = Arc::new(MemoryOrderStore::new());
    let service = service_over(&store);
    service.wait_until_preloaded().await;

    let input = order_with_items("twice", 3);
    service.save_order(&input).await.unwrap();
    service.save_order(&input).await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(service.cache().len(), 1);

    let stored = store.stored("twice").unwrap();
    let cached = service.get_order("twice").await.unwrap();
    let expected = serde_json::to_vec(&input).unwrap();
    assert_eq!(serde_json::to_vec(&stored).unwrap(), expected);
    assert_eq!(serde_json::to_vec(&cached).unwrap(), expected);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let store = Arc::new(MemoryOrderStore::new());
    let service = service_over(&store);

    let err = service.get_order("missing-id").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!service.cache().contains("missing-id"));
}

#[tokio::test]
async fn preload_loads_every_stored_order() {
    let seeded: Vec<Order> = (0..25).map(|n| order(&format!("order-{n}"))).collect();
    let store = Arc::new(MemoryOrderStore::seeded(seeded.clone()));
    let service = service_over(&store);

    let status = service.wait_until_preloaded().await;

    assert_eq!(status, PreloadStatus::Complete { loaded: 25 });
    assert_eq!(uids(&service.get_all_orders()), uids(&seeded));
}

#[tokio::test]
async fn get_all_orders_is_served_from_the_cache() {
    let store = Arc::new(MemoryOrderStore::seeded([order("a")]));
    let service = service_over(&store);
    service.wait_until_preloaded().await;

    store.insert_direct(order("outside"));
    for _ in 0..3 {
        assert_eq!(uids(&service.get_all_orders()), uids(&[order("a")]));
    }
    assert_eq!(store.get_all_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_leave_one_whole_payload() {
    let store = Arc::new(MemoryOrderStore::new());
    let service = Arc::new(service_over(&store));
    service.wait_until_preloaded().await;

    let mut left = order_with_items("race", 1);
    left.track_number = "LEFT".into();
    left.delivery.city = "Left City".into();
    left.payment.amount = 1;

    let mut right = order_with_items("race", 4);
    right.track_number = "RIGHT".into();
    right.delivery.city = "Right City".into();
    right.payment.amount = 2;

    for _ in 0..50 {
        let a = {
            let service = Arc::clone(&service);
            let order = left.clone();
            tokio::spawn(async move { service.save_order(&order).await })
        };
        let b = {
            let service = Arc::clone(&service);
            let order = right.clone();
            tokio::spawn(async move { service.save_order(&order).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let cached = service.cache().get("race").unwrap();
        assert!(cached == left || cached == right, "cache holds a merge: {cached:?}");

        let stored = store.stored("race").unwrap();
        assert!(stored == left || stored == right);
    }
    assert_eq!(service.cache().len(), 1);
}

#[tokio::test]
async fn startup_scenario_with_lazy_lookup_and_save() {
    let (store, gate) = MemoryOrderStore::seeded([order("A"), order("B")]).with_preload_gate();
    let store = Arc::new(store);
    let service = service_over(&store);

    let early = uids(&service.get_all_orders());
    let expected: HashSet<String> = ["A", "B"].into_iter().map(String::from).collect();
    assert!(early.is_subset(&expected));
    assert_eq!(service.preload_status(), PreloadStatus::Pending);

    gate.send(()).unwrap();
    assert!(service.wait_until_preloaded().await.is_settled());
    assert_eq!(uids(&service.get_all_orders()), expected);

    let err = service.get_order("C").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.get_calls(), 1);

    service.save_order(&order("C")).await.unwrap();
    assert_eq!(service.get_order("C").await.unwrap(), order("C"));
    assert_eq!(store.get_calls(), 1);
}

#[tokio::test]
async fn save_during_preload_is_not_overwritten() {
    let stale = order("A");
    let (store, gate) = MemoryOrderStore::seeded([stale.clone()]).with_preload_gate();
    let store = Arc::new(store);
    let service = service_over(&store);

    let mut fresh = stale.clone();
    fresh.track_number = "FRESH".into();
    service.save_order(&fresh).await.unwrap();

    gate.send(()).unwrap();
    service.wait_until_preloaded().await;

    assert_eq!(service.get_order("A").await.unwrap(), fresh);
}

#[tokio::test]
async fn failed_preload_backfills_lazily() {
    let store = Arc::new(MemoryOrderStore::seeded([order("a"), order("b")]));
    store.fail_get_all(true);
    let service = service_over(&store);

    let status = service.wait_until_preloaded().await;
    assert!(matches!(status, PreloadStatus::Failed { .. }));
    assert!(service.get_all_orders().is_empty());

    tokio_test::assert_ok!(service.get_order("b").await);
    assert_eq!(uids(&service.get_all_orders()), uids(&[order("b")]));
}
