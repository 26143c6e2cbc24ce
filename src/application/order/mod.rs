//! Order use cases.

mod preload;
mod service;

pub use preload::PreloadStatus;
pub use service::OrderService;
