//! The `upstream` module owns the connection to the telemetry broker.
//!
//! It resolves the broker address through a directory lookup, maintains the
//! MQTT session and its reconnection state machine, decodes inbound
//! payloads, and emits typed events for the bridge to consume.

pub mod directory;
pub mod event;
pub mod subscriber;

pub use directory::{ConfigDirectory, EndpointDirectory};
pub use event::UpstreamEvent;
pub use subscriber::{ConnectionPhase, UpstreamSubscriber};

#[cfg(test)]
mod tests;
