use serde_json::json;

use super::translate;
use super::{CanonicalRecord, RawPayload, Topic};
use crate::utils::BridgeError;

fn payload(value: serde_json::Value) -> RawPayload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {:?}", other),
    }
}

#[test]
fn test_topic_names_round_trip() {
    for topic in Topic::ALL {
        assert_eq!(Topic::from_name(topic.name()), Some(topic));
    }
}

#[test]
fn test_unknown_topic_name() {
    assert_eq!(Topic::from_name("dronesense/battery"), None);
    assert_eq!(Topic::from_name(""), None);
}

#[test]
fn test_translate_temp_humidity() {
    let raw = payload(json!({"temp": 21.5, "humidity": 40}));
    let record = translate(Topic::TempHumidity, &raw).unwrap();
    assert_eq!(record.topic(), Topic::TempHumidity);
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"topic":"dronesense/temp-humidity","temp":21.5,"humidity":40}"#
    );
}

#[test]
fn test_translate_accelerometer() {
    let raw = payload(json!({"accelX": 0.1, "accelY": -0.2, "accelZ": 9.8}));
    let record = translate(Topic::Accelerometer, &raw).unwrap();
    assert_eq!(record.topic(), Topic::Accelerometer);
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"topic":"dronesense/accelerometer","x":0.1,"y":-0.2,"z":9.8}"#
    );
}

#[test]
fn test_translate_gps() {
    let raw = payload(json!({"latitude": 51.5, "longitude": -0.12}));
    let record = translate(Topic::Gps, &raw).unwrap();
    assert_eq!(record.topic(), Topic::Gps);
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"topic":"dronesense/gps","lat":51.5,"lon":-0.12}"#
    );
}

#[test]
fn test_translate_missing_field_is_invalid() {
    let raw = payload(json!({"temp": 21.5}));
    match translate(Topic::TempHumidity, &raw) {
        Err(BridgeError::TranslationInvalid { topic, field }) => {
            assert_eq!(topic, Topic::TempHumidity);
            assert_eq!(field, "humidity");
        }
        other => panic!("expected TranslationInvalid, got {:?}", other),
    }
}

#[test]
fn test_translate_non_numeric_field_is_invalid() {
    let raw = payload(json!({"latitude": "51.5", "longitude": -0.12}));
    match translate(Topic::Gps, &raw) {
        Err(BridgeError::TranslationInvalid { topic, field }) => {
            assert_eq!(topic, Topic::Gps);
            assert_eq!(field, "latitude");
        }
        other => panic!("expected TranslationInvalid, got {:?}", other),
    }
}

#[test]
fn test_translate_ignores_extra_fields() {
    let raw = payload(json!({"temp": 20, "humidity": 55, "battery": 97}));
    let record = translate(Topic::TempHumidity, &raw).unwrap();
    assert_eq!(
        record,
        CanonicalRecord::TempHumidity {
            temp: 20.into(),
            humidity: 55.into(),
        }
    );
}

#[test]
fn test_canonical_record_round_trips() {
    let frame = r#"{"topic":"dronesense/accelerometer","x":0.1,"y":-0.2,"z":9.8}"#;
    let record: CanonicalRecord = serde_json::from_str(frame).unwrap();
    assert_eq!(record.topic(), Topic::Accelerometer);
    assert_eq!(serde_json::to_string(&record).unwrap(), frame);
}
