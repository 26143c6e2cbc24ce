//! The order aggregate.
//!
//! An [`Order`] owns exactly one [`Delivery`], exactly one [`Payment`] and an
//! ordered list of [`Item`]s. The sub-records have no lifecycle of their own:
//! they are written, read and replaced only as part of their order.
//!
//! Field names match the JSON documents carried by the feed and the HTTP API.
//! Every field except `order_uid` defaults when absent, so a sparse document
//! still decodes and is then judged by [`Order::validate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::OrderError;
use super::id::OrderUid;
use crate::error::Result;

/// Recipient and address of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

/// Payment details of an order. Amounts are integer minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub transaction: String,
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

/// A single line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i64,
    pub rid: String,
    pub name: String,
    pub sale: i64,
    pub size: String,
    pub total_price: i64,
    pub nm_id: i64,
    pub brand: String,
    pub status: i64,
}

/// The order aggregate root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_uid: OrderUid,
    pub track_number: String,
    pub entry: String,
    pub delivery: Delivery,
    pub payment: Payment,
    pub items: Vec<Item>,
    pub locale: String,
    pub internal_signature: String,
    pub customer_id: String,
    pub delivery_service: String,
    pub shardkey: String,
    pub sm_id: i64,
    pub date_created: DateTime<Utc>,
    pub oof_shard: String,
}

impl Order {
    /// The order's identifier.
    #[must_use]
    pub fn uid(&self) -> &OrderUid {
        &self.order_uid
    }

    /// Check the aggregate's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Invalid`] when `order_uid` is blank.
    pub fn validate(&self) -> std::result::Result<(), OrderError> {
        if self.order_uid.is_blank() {
            return Err(OrderError::invalid("order_uid must not be empty"));
        }
        Ok(())
    }

    /// Decode a JSON document into a validated order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::error::Error::Json) for malformed JSON and
    /// [`Error::Order`](crate::error::Error::Order) when the decoded record is
    /// invalid.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        let order: Self = serde_json::from_slice(payload)?;
        order.validate()?;
        Ok(order)
    }
}
