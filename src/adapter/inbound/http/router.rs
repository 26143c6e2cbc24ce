//! Route table and middleware stack.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use super::{handler, health};
use crate::application::order::OrderService;
use crate::infrastructure::config::http::HttpConfig;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: Arc<OrderService>) -> Self {
        Self { service }
    }
}

/// UUIDv4 request ids for requests that arrive without one.
#[derive(Clone, Copy)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// API and probe routes, without middleware or state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/orders",
            get(handler::list_orders).post(handler::create_order),
        )
        .route("/api/orders/{order_uid}", get(handler::get_order))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
}

/// Wrap `router` in the standard middleware stack.
///
/// Outermost first: request id assignment, request id propagation, tracing,
/// panic recovery, then the per-request timeout.
pub fn with_middleware(router: Router, timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, XRequestId))
}

/// Build the complete application router.
///
/// The static directory is mounted under `/static` and as the fallback for
/// `/` only when it exists.
pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    let mut router = routes();

    let static_dir = Path::new(&config.static_dir);
    if static_dir.is_dir() {
        router = router
            .nest_service("/static", ServeDir::new(static_dir))
            .fallback_service(ServeDir::new(static_dir));
    } else {
        warn!(static_dir = %config.static_dir, "Static directory not found, UI disabled");
    }

    with_middleware(router.with_state(state), config.timeout())
}
