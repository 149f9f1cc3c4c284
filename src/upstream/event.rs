use crate::telemetry::{RawPayload, Topic};

/// One decoded broker message, emitted in arrival order onto the bridge
/// channel.
#[derive(Debug, Clone)]
pub struct UpstreamEvent {
    pub topic: Topic,
    pub payload: RawPayload,
}
