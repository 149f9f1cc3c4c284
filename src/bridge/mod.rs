//! The `bridge` module is the composition root of the application.
//!
//! It wires the upstream subscriber, the translator, the broadcaster, and
//! the subscriber endpoint together, and owns startup and shutdown
//! ordering.

pub mod service;

pub use service::BridgeService;
