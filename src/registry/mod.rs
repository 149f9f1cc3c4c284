//! The `registry` module tracks active subscriber connections.
//!
//! It owns every [`ClientConnection`] for the lifetime of the process and
//! implements the fan-out primitive: best-effort delivery of one frame to
//! every connection currently open, with per-client failure isolation.

pub mod connection;
pub mod engine;

pub use connection::{ClientConnection, ConnectionState};
pub use engine::{ConnectionRegistry, SharedRegistry};
