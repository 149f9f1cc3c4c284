//! # DroneBridge
//!
//! `dronebridge` is a real-time relay that bridges drone sensor telemetry
//! from an MQTT broker to WebSocket subscribers. Broker payloads are
//! translated into a canonical, topic-tagged wire schema and fanned out to
//! every connected subscriber; nothing is stored.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `telemetry`: the fixed topic set, canonical record shapes, and the payload translator.
//! - `upstream`: the MQTT subscriber owning the broker session and its reconnection state machine.
//! - `registry`: tracks active subscriber connections and implements best-effort fan-out.
//! - `broadcast`: serializes canonical records and pushes them through the registry.
//! - `bridge`: the composition root wiring the pipeline together and owning shutdown.
//! - `transport`: the WebSocket endpoint subscribers connect to.
//! - `config`: handles loading and merging server and upstream configuration.
//! - `utils`: shared error taxonomy and logging setup.

pub mod bridge;
pub mod broadcast;
pub mod config;
pub mod registry;
pub mod telemetry;
pub mod transport;
pub mod upstream;
pub mod utils;
