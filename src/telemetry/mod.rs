//! The `telemetry` module defines the sensor data model of the bridge.
//!
//! It holds the closed set of broker topics, the raw payload shape decoded
//! from broker message bodies, the canonical record sent to subscribers,
//! and the translation between the two.

pub mod record;
pub mod topic;
pub mod translate;

pub use record::{CanonicalRecord, RawPayload};
pub use topic::Topic;
pub use translate::translate;

#[cfg(test)]
mod tests;
