use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::telemetry::Topic;

/// Untyped key/value mapping decoded from a broker message body.
///
/// The expected shape depends on the topic the message arrived on; see
/// [`crate::telemetry::translate`].
pub type RawPayload = serde_json::Map<String, serde_json::Value>;

/// The normalized, topic-tagged record sent to subscribers.
///
/// Serializes as a JSON object whose `topic` field carries the broker topic
/// string, e.g. `{"topic":"dronesense/gps","lat":51.5,"lon":-0.12}`. The
/// tag is derived from the variant, so a record's `topic` always matches
/// its shape. Fields are `serde_json::Number` so integer readings stay
/// integers on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic")]
pub enum CanonicalRecord {
    #[serde(rename = "dronesense/temp-humidity")]
    TempHumidity { temp: Number, humidity: Number },

    #[serde(rename = "dronesense/accelerometer")]
    Accelerometer { x: Number, y: Number, z: Number },

    #[serde(rename = "dronesense/gps")]
    Gps { lat: Number, lon: Number },
}

impl CanonicalRecord {
    /// The topic this record belongs to.
    pub fn topic(&self) -> Topic {
        match self {
            CanonicalRecord::TempHumidity { .. } => Topic::TempHumidity,
            CanonicalRecord::Accelerometer { .. } => Topic::Accelerometer,
            CanonicalRecord::Gps { .. } => Topic::Gps,
        }
    }
}
