//! Infrastructure configuration modules.

pub mod feed;
pub mod http;
pub mod logging;
pub mod settings;

pub use settings::{Config, Environment};
