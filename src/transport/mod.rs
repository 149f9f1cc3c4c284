//! The `transport` module is responsible for network communication with
//! subscribers over WebSockets.
//!
//! It accepts connections, registers them with the connection registry, and
//! runs the per-connection send and receive loops. Subscribers never speak
//! to the bridge; inbound frames are ignored.

pub mod websocket;

#[cfg(test)]
mod websocket_tests;
