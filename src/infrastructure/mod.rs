//! Infrastructure: configuration and process orchestration.

pub mod config;
pub mod orchestration;
