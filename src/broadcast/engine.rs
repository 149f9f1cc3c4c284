use tracing::{debug, error};
use tungstenite::protocol::Message as WsMessage;

use crate::registry::SharedRegistry;
use crate::telemetry::CanonicalRecord;

/// Fans canonical records out to every open subscriber.
///
/// Stateless beyond the registry handle it holds; serialization happens
/// here so the registry only ever deals in ready-made frames.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: SharedRegistry,
}

impl Broadcaster {
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// Serializes `record` and delivers the frame to all open connections.
    pub fn publish(&self, record: &CanonicalRecord) {
        let text = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                error!(topic = %record.topic(), error = %e, "failed to serialize record");
                return;
            }
        };
        debug!(topic = %record.topic(), frame = %text, "broadcasting frame");
        self.registry.lock().unwrap().broadcast(WsMessage::text(text));
    }
}
