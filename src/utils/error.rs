//! Error taxonomy for the bridge.
//!
//! Broker-side and per-message failures are contained where they occur
//! (logged and dropped, or retried with backoff); only startup failures are
//! allowed to propagate out of `BridgeService::run` and terminate the
//! process.

use crate::telemetry::Topic;

/// Errors that can occur while bridging broker telemetry to subscribers.
#[derive(Debug)]
pub enum BridgeError {
    /// Endpoint resolution through the directory lookup failed.
    Directory(String),
    /// Transport-level failure while connecting to the upstream broker.
    BrokerConnect(rumqttc::ConnectionError),
    /// A subscribe or unsubscribe request could not be issued.
    Subscribe(rumqttc::ClientError),
    /// A broker message body was not valid JSON.
    PayloadDecode {
        /// Broker topic the message arrived on.
        topic: String,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
    /// A decoded payload was missing a required numeric field.
    TranslationInvalid {
        /// Topic whose schema the payload failed to satisfy.
        topic: Topic,
        /// Name of the missing or non-numeric field.
        field: &'static str,
    },
    /// A write to one subscriber connection failed.
    SubscriberSend {
        /// Registry id of the failed connection.
        connection: String,
        /// Transport-reported reason.
        reason: String,
    },
    /// Configuration could not be loaded.
    Config(config::ConfigError),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::Directory(reason) => {
                write!(f, "endpoint resolution failed: {}", reason)
            }
            BridgeError::BrokerConnect(e) => {
                write!(f, "broker connection failed: {}", e)
            }
            BridgeError::Subscribe(e) => {
                write!(f, "broker subscription failed: {}", e)
            }
            BridgeError::PayloadDecode { topic, source } => {
                write!(f, "malformed payload on '{}': {}", topic, source)
            }
            BridgeError::TranslationInvalid { topic, field } => {
                write!(
                    f,
                    "payload on '{}' missing numeric field '{}'",
                    topic.name(),
                    field
                )
            }
            BridgeError::SubscriberSend { connection, reason } => {
                write!(f, "send to subscriber {} failed: {}", connection, reason)
            }
            BridgeError::Config(e) => write!(f, "configuration error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::BrokerConnect(e) => Some(e),
            BridgeError::Subscribe(e) => Some(e),
            BridgeError::PayloadDecode { source, .. } => Some(source),
            BridgeError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rumqttc::ConnectionError> for BridgeError {
    fn from(err: rumqttc::ConnectionError) -> Self {
        BridgeError::BrokerConnect(err)
    }
}

impl From<rumqttc::ClientError> for BridgeError {
    fn from(err: rumqttc::ClientError) -> Self {
        BridgeError::Subscribe(err)
    }
}

impl From<config::ConfigError> for BridgeError {
    fn from(err: config::ConfigError) -> Self {
        BridgeError::Config(err)
    }
}
