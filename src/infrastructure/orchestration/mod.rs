//! Composition root and lifecycle.

pub mod runtime;

pub use runtime::{execute_serve, open_store, run_with_shutdown, serve_with};
