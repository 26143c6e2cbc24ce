//! SQLite order store implementation.
//!
//! An [`Order`] is split across four tables: the header in `orders`, one row
//! each in `deliveries` and `payments`, and one row per line item in `items`.
//! Writes replace the whole aggregate inside a single immediate transaction.
//! Reads assemble it from all four inside one transaction so they never see
//! half of a concurrent write.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::warn;

use async_trait::async_trait;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    DeliveryRow, ItemRow, OrderRow, PaymentRow,
};
use crate::adapter::outbound::sqlite::database::schema::{deliveries, items, orders, payments};
use crate::domain::{Delivery, Item, Order, OrderUid, Payment};
use crate::error::{Error, Result};
use crate::port::OrderStore;

/// Rows making up one stored aggregate.
type AggregateRows = (OrderRow, Option<DeliveryRow>, Option<PaymentRow>, Vec<ItemRow>);

/// SQLite-backed order store.
///
/// Diesel connections are blocking, so every call runs on the blocking pool.
#[derive(Clone)]
pub struct SqliteOrderStore {
    pool: DbPool,
}

impl SqliteOrderStore {
    /// Create a new store over an already-migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| Error::Database(format!("store task failed: {e}")))?
    }

    fn to_rows(order: &Order) -> (OrderRow, DeliveryRow, PaymentRow, Vec<ItemRow>) {
        let uid = order.order_uid.to_string();
        let header = OrderRow {
            order_uid: uid.clone(),
            track_number: order.track_number.clone(),
            entry: order.entry.clone(),
            locale: order.locale.clone(),
            internal_signature: order.internal_signature.clone(),
            customer_id: order.customer_id.clone(),
            delivery_service: order.delivery_service.clone(),
            shardkey: order.shardkey.clone(),
            sm_id: order.sm_id,
            date_created: order.date_created.to_rfc3339(),
            oof_shard: order.oof_shard.clone(),
        };
        let d = &order.delivery;
        let delivery = DeliveryRow {
            order_uid: uid.clone(),
            name: d.name.clone(),
            phone: d.phone.clone(),
            zip: d.zip.clone(),
            city: d.city.clone(),
            address: d.address.clone(),
            region: d.region.clone(),
            email: d.email.clone(),
        };
        let p = &order.payment;
        let payment = PaymentRow {
            order_uid: uid.clone(),
            transaction: p.transaction.clone(),
            request_id: p.request_id.clone(),
            currency: p.currency.clone(),
            provider: p.provider.clone(),
            amount: p.amount,
            payment_dt: p.payment_dt,
            bank: p.bank.clone(),
            delivery_cost: p.delivery_cost,
            goods_total: p.goods_total,
            custom_fee: p.custom_fee,
        };
        let items = order
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| ItemRow {
                order_uid: uid.clone(),
                position: i32::try_from(position).unwrap_or(i32::MAX),
                chrt_id: item.chrt_id,
                track_number: item.track_number.clone(),
                price: item.price,
                rid: item.rid.clone(),
                name: item.name.clone(),
                sale: item.sale,
                size: item.size.clone(),
                total_price: item.total_price,
                nm_id: item.nm_id,
                brand: item.brand.clone(),
                status: item.status,
            })
            .collect();
        (header, delivery, payment, items)
    }

    fn from_rows(
        header: OrderRow,
        delivery: Option<DeliveryRow>,
        payment: Option<PaymentRow>,
        items: Vec<ItemRow>,
    ) -> Result<Order> {
        let uid = header.order_uid;
        let delivery = delivery
            .ok_or_else(|| Error::Database(format!("order {uid} has no delivery row")))?;
        let payment =
            payment.ok_or_else(|| Error::Database(format!("order {uid} has no payment row")))?;
        let date_created: DateTime<Utc> = DateTime::parse_from_rfc3339(&header.date_created)
            .map_err(|e| Error::Parse(format!("order {uid} date_created: {e}")))?
            .with_timezone(&Utc);

        Ok(Order {
            order_uid: OrderUid::from(uid),
            track_number: header.track_number,
            entry: header.entry,
            delivery: Delivery {
                name: delivery.name,
                phone: delivery.phone,
                zip: delivery.zip,
                city: delivery.city,
                address: delivery.address,
                region: delivery.region,
                email: delivery.email,
            },
            payment: Payment {
                transaction: payment.transaction,
                request_id: payment.request_id,
                currency: payment.currency,
                provider: payment.provider,
                amount: payment.amount,
                payment_dt: payment.payment_dt,
                bank: payment.bank,
                delivery_cost: payment.delivery_cost,
                goods_total: payment.goods_total,
                custom_fee: payment.custom_fee,
            },
            items: items
                .into_iter()
                .map(|row| Item {
                    chrt_id: row.chrt_id,
                    track_number: row.track_number,
                    price: row.price,
                    rid: row.rid,
                    name: row.name,
                    sale: row.sale,
                    size: row.size,
                    total_price: row.total_price,
                    nm_id: row.nm_id,
                    brand: row.brand,
                    status: row.status,
                })
                .collect(),
            locale: header.locale,
            internal_signature: header.internal_signature,
            customer_id: header.customer_id,
            delivery_service: header.delivery_service,
            shardkey: header.shardkey,
            sm_id: header.sm_id,
            date_created,
            oof_shard: header.oof_shard,
        })
    }

    fn write(conn: &mut SqliteConnection, order: &Order) -> QueryResult<()> {
        let (header, delivery, payment, item_rows) = Self::to_rows(order);
        conn.immediate_transaction(|conn| {
            diesel::replace_into(orders::table)
                .values(&header)
                .execute(conn)?;
            diesel::replace_into(deliveries::table)
                .values(&delivery)
                .execute(conn)?;
            diesel::replace_into(payments::table)
                .values(&payment)
                .execute(conn)?;
            diesel::delete(items::table.filter(items::order_uid.eq(&header.order_uid)))
                .execute(conn)?;
            if !item_rows.is_empty() {
                diesel::insert_into(items::table)
                    .values(&item_rows)
                    .execute(conn)?;
            }
            Ok(())
        })
    }

    fn read_one(conn: &mut SqliteConnection, uid: &str) -> QueryResult<Option<AggregateRows>> {
        conn.transaction(|conn| {
            let Some(header) = orders::table
                .find(uid)
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?
            else {
                return Ok(None);
            };
            let delivery = deliveries::table
                .find(uid)
                .select(DeliveryRow::as_select())
                .first(conn)
                .optional()?;
            let payment = payments::table
                .find(uid)
                .select(PaymentRow::as_select())
                .first(conn)
                .optional()?;
            let item_rows = items::table
                .filter(items::order_uid.eq(uid))
                .order(items::position.asc())
                .select(ItemRow::as_select())
                .load(conn)?;
            Ok(Some((header, delivery, payment, item_rows)))
        })
    }

    fn read_all(conn: &mut SqliteConnection) -> QueryResult<Vec<AggregateRows>> {
        conn.transaction(|conn| {
            let headers = orders::table
                .order(orders::order_uid.asc())
                .select(OrderRow::as_select())
                .load(conn)?;
            let mut delivery_rows: HashMap<String, DeliveryRow> = deliveries::table
                .select(DeliveryRow::as_select())
                .load(conn)?
                .into_iter()
                .map(|row| (row.order_uid.clone(), row))
                .collect();
            let mut payment_rows: HashMap<String, PaymentRow> = payments::table
                .select(PaymentRow::as_select())
                .load(conn)?
                .into_iter()
                .map(|row| (row.order_uid.clone(), row))
                .collect();
            let mut item_rows: HashMap<String, Vec<ItemRow>> = HashMap::new();
            for row in items::table
                .order((items::order_uid.asc(), items::position.asc()))
                .select(ItemRow::as_select())
                .load(conn)?
            {
                item_rows.entry(row.order_uid.clone()).or_default().push(row);
            }

            Ok(headers
                .into_iter()
                .map(|header| {
                    let uid = header.order_uid.clone();
                    (
                        header,
                        delivery_rows.remove(&uid),
                        payment_rows.remove(&uid),
                        item_rows.remove(&uid).unwrap_or_default(),
                    )
                })
                .collect())
        })
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn save_order(&self, order: &Order) -> Result<()> {
        let order = order.clone();
        self.with_conn(move |conn| {
            Self::write(conn, &order).map_err(|e| Error::Database(e.to_string()))
        })
        .await
    }

    async fn get_order(&self, uid: &OrderUid) -> Result<Option<Order>> {
        let uid = uid.to_string();
        let rows = self
            .with_conn(move |conn| {
                Self::read_one(conn, &uid).map_err(|e| Error::Database(e.to_string()))
            })
            .await?;
        rows.map(|(header, delivery, payment, items)| {
            Self::from_rows(header, delivery, payment, items)
        })
        .transpose()
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>> {
        let rows = self
            .with_conn(|conn| Self::read_all(conn).map_err(|e| Error::Database(e.to_string())))
            .await?;

        let mut assembled = Vec::with_capacity(rows.len());
        for (header, delivery, payment, items) in rows {
            let uid = header.order_uid.clone();
            match Self::from_rows(header, delivery, payment, items) {
                Ok(order) => assembled.push(order),
                Err(e) => warn!(order_uid = %uid, error = %e, "Skipping unreadable order"),
            }
        }
        Ok(assembled)
    }
}
