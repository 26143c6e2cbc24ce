//! Order endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::error::ApiError;
use super::router::AppState;
use crate::domain::Order;

/// `GET /api/orders`
pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.service.get_all_orders())
}

/// `GET /api/orders/{order_uid}`
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_uid): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state.service.get_order(&order_uid).await?;
    Ok(Json(order))
}

/// `POST /api/orders`
///
/// The body is decoded by hand so that malformed documents are reported as
/// `400` with the crate's own error message.
pub async fn create_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = Order::from_json(&body)?;
    state.service.save_order(&order).await?;
    info!(order_uid = %order.order_uid, "Order accepted over HTTP");
    Ok((StatusCode::CREATED, Json(order)))
}
