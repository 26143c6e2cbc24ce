//! Builders for sample order aggregates.

use chrono::{TimeZone, Utc};

use crate::domain::{Delivery, Item, Order, OrderUid, Payment};

/// A complete order with one item.
#[must_use]
pub fn order(uid: &str) -> Order {
    order_with_items(uid, 1)
}

/// A complete order with `items` line items.
#[must_use]
pub fn order_with_items(uid: &str, items: usize) -> Order {
    Order {
        order_uid: OrderUid::new(uid),
        track_number: "WBILMTESTTRACK".into(),
        entry: "WBIL".into(),
        delivery: Delivery {
            name: "Test Testov".into(),
            phone: "+9720000000".into(),
            zip: "2639809".into(),
            city: "Kiryat Mozkin".into(),
            address: "Ploshad Mira 15".into(),
            region: "Kraiot".into(),
            email: "test@gmail.com".into(),
        },
        payment: Payment {
            transaction: uid.into(),
            request_id: String::new(),
            currency: "USD".into(),
            provider: "wbpay".into(),
            amount: 1817,
            payment_dt: 1_637_907_727,
            bank: "alpha".into(),
            delivery_cost: 1500,
            goods_total: 317,
            custom_fee: 0,
        },
        items: (0..items).map(|i| item(i as i64)).collect(),
        locale: "en".into(),
        internal_signature: String::new(),
        customer_id: "test".into(),
        delivery_service: "meest".into(),
        shardkey: "9".into(),
        sm_id: 99,
        date_created: Utc.with_ymd_and_hms(2021, 11, 26, 6, 22, 19).unwrap(),
        oof_shard: "1".into(),
    }
}

/// A line item whose fields are derived from `n`.
#[must_use]
pub fn item(n: i64) -> Item {
    Item {
        chrt_id: 9_934_930 + n,
        track_number: "WBILMTESTTRACK".into(),
        price: 453 + n,
        rid: format!("ab4219087a764ae0btest-{n}"),
        name: "Mascaras".into(),
        sale: 30,
        size: "0".into(),
        total_price: 317,
        nm_id: 2_389_212,
        brand: "Vivienne Sabo".into(),
        status: 202,
    }
}

/// JSON document of [`order`].
#[must_use]
pub fn order_json(uid: &str) -> Vec<u8> {
    serde_json::to_vec(&order(uid)).expect("sample order serializes")
}
