use serde_json::{Number, Value};

use crate::telemetry::{CanonicalRecord, RawPayload, Topic};
use crate::utils::BridgeError;

/// Translates a raw broker payload into the canonical record for `topic`.
///
/// Pure function: extracts the documented fields by name, renaming them to
/// the canonical schema (`accelX` → `x`, `latitude` → `lat`, and so on).
/// A missing or non-numeric required field makes the whole record invalid
/// and the message is dropped before broadcast.
pub fn translate(topic: Topic, payload: &RawPayload) -> Result<CanonicalRecord, BridgeError> {
    let record = match topic {
        Topic::TempHumidity => CanonicalRecord::TempHumidity {
            temp: number_field(topic, payload, "temp")?,
            humidity: number_field(topic, payload, "humidity")?,
        },
        Topic::Accelerometer => CanonicalRecord::Accelerometer {
            x: number_field(topic, payload, "accelX")?,
            y: number_field(topic, payload, "accelY")?,
            z: number_field(topic, payload, "accelZ")?,
        },
        Topic::Gps => CanonicalRecord::Gps {
            lat: number_field(topic, payload, "latitude")?,
            lon: number_field(topic, payload, "longitude")?,
        },
    };
    Ok(record)
}

fn number_field(
    topic: Topic,
    payload: &RawPayload,
    field: &'static str,
) -> Result<Number, BridgeError> {
    match payload.get(field) {
        Some(Value::Number(n)) => Ok(n.clone()),
        _ => Err(BridgeError::TranslationInvalid { topic, field }),
    }
}
