use std::time::Duration;

use super::directory::{ConfigDirectory, EndpointDirectory};
use super::subscriber::{decode_publish, parse_endpoint, retry_delay};
use crate::config::UpstreamSettings;
use crate::telemetry::Topic;
use crate::utils::BridgeError;

#[test]
fn test_decode_publish_valid_payload() {
    let event = decode_publish(
        "dronesense/temp-humidity",
        br#"{"temp": 21.5, "humidity": 40}"#,
    )
    .unwrap();
    assert_eq!(event.topic, Topic::TempHumidity);
    assert_eq!(event.payload.get("temp").unwrap().as_f64(), Some(21.5));
}

#[test]
fn test_decode_publish_malformed_body_is_dropped() {
    assert!(decode_publish("dronesense/gps", b"not-json").is_none());
}

#[test]
fn test_decode_publish_non_object_body_is_dropped() {
    assert!(decode_publish("dronesense/gps", b"[1, 2, 3]").is_none());
}

#[test]
fn test_decode_publish_unexpected_topic_is_dropped() {
    assert!(decode_publish("dronesense/battery", br#"{"level": 97}"#).is_none());
}

#[test]
fn test_parse_endpoint_with_port() {
    let (host, port) = parse_endpoint("broker.example.com:8883").unwrap();
    assert_eq!(host, "broker.example.com");
    assert_eq!(port, 8883);
}

#[test]
fn test_parse_endpoint_defaults_to_mqtt_port() {
    let (host, port) = parse_endpoint("broker.example.com").unwrap();
    assert_eq!(host, "broker.example.com");
    assert_eq!(port, 1883);
}

#[test]
fn test_parse_endpoint_rejects_bad_port() {
    assert!(matches!(
        parse_endpoint("broker.example.com:mqtt"),
        Err(BridgeError::Directory(_))
    ));
    assert!(matches!(
        parse_endpoint(":1883"),
        Err(BridgeError::Directory(_))
    ));
}

#[test]
fn test_retry_delay_grows_and_caps() {
    let settings = UpstreamSettings::default();
    let initial = Duration::from_millis(settings.retry_initial_ms);
    let max = Duration::from_millis(settings.retry_max_ms);

    assert_eq!(retry_delay(1, &settings), initial);
    assert_eq!(retry_delay(2, &settings), initial * 2);
    assert_eq!(retry_delay(3, &settings), initial * 4);
    assert_eq!(retry_delay(30, &settings), max);
}

#[tokio::test]
async fn test_config_directory_resolves_endpoint() {
    let settings = UpstreamSettings {
        endpoint: Some("broker.example.com:1883".to_string()),
        ..UpstreamSettings::default()
    };
    let directory = ConfigDirectory::new(&settings);
    assert_eq!(
        directory.resolve().await.unwrap(),
        "broker.example.com:1883"
    );
}

#[tokio::test]
async fn test_config_directory_fails_without_endpoint() {
    let directory = ConfigDirectory::new(&UpstreamSettings::default());
    assert!(matches!(
        directory.resolve().await,
        Err(BridgeError::Directory(_))
    ));
}
