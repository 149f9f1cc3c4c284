//! The `utils` module provides shared definitions used across the
//! `dronebridge` application.
//!
//! It centralizes the error taxonomy and the tracing setup so that every
//! other module reports failures and events the same way.

pub mod error;
pub mod logging;

pub use error::BridgeError;
