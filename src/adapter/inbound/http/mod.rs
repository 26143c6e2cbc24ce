//! HTTP API over the order service.
//!
//! - [`router`] - Route table, middleware stack and shared state
//! - [`handler`] - Order endpoints
//! - [`health`] - Liveness and readiness probes
//! - [`error`] - JSON error responses

pub mod error;
pub mod handler;
pub mod health;
pub mod router;

pub use error::ApiError;
pub use router::{build_router, AppState};
