//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::router::AppState;
use crate::application::order::PreloadStatus;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    preload: PreloadStatus,
    cached_orders: usize,
}

/// `GET /health/live`
pub async fn live() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /health/ready`: 503 until the cache preload has settled.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let preload = state.service.preload_status();
    let (code, status) = if preload.is_settled() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "loading")
    };
    (
        code,
        Json(ReadinessResponse {
            status,
            preload,
            cached_orders: state.service.cache().len(),
        }),
    )
}
