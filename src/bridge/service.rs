use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

use crate::broadcast::Broadcaster;
use crate::config::Settings;
use crate::registry::{ConnectionRegistry, SharedRegistry};
use crate::telemetry::{Topic, translate};
use crate::transport::websocket::start_subscriber_server;
use crate::upstream::{ConfigDirectory, UpstreamEvent, UpstreamSubscriber};
use crate::utils::BridgeError;

/// Wires broker telemetry to WebSocket subscribers.
///
/// The registry and broadcaster are built before the upstream subscriber
/// starts, and the subscriber is stopped before the remaining connections
/// are closed, so no frame is ever delivered into a torn-down registry.
pub struct BridgeService {
    registry: SharedRegistry,
    broadcaster: Broadcaster,
}

impl BridgeService {
    pub fn new() -> Self {
        let registry: SharedRegistry = Arc::new(Mutex::new(ConnectionRegistry::new()));
        let broadcaster = Broadcaster::new(registry.clone());
        Self {
            registry,
            broadcaster,
        }
    }

    /// Runs the bridge until the upstream channel closes or a shutdown
    /// signal arrives.
    ///
    /// A first-connect failure against the broker is fatal and propagates
    /// to the caller; everything after that is handled internally.
    pub async fn run(self, settings: Settings) -> Result<(), BridgeError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<UpstreamEvent>();

        let directory = ConfigDirectory::new(&settings.upstream);
        let subscriber =
            UpstreamSubscriber::start(&directory, &Topic::ALL, event_tx, &settings.upstream)
                .await?;

        let addr = format!("{}:{}", settings.server.host, settings.server.port);

        tokio::select! {
            _ = start_subscriber_server(addr, self.registry.clone()) => {
                error!("subscriber endpoint exited unexpectedly");
            }
            _ = Self::pump(event_rx, self.broadcaster.clone()) => {
                error!("upstream event channel closed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, stopping bridge");
            }
        }

        subscriber.stop().await;
        self.registry.lock().unwrap().close_all();
        Ok(())
    }

    /// Processing loop: consumes upstream events in arrival order and fans
    /// each valid record out to subscribers.
    async fn pump(mut events: UnboundedReceiver<UpstreamEvent>, broadcaster: Broadcaster) {
        while let Some(event) = events.recv().await {
            Self::dispatch(&broadcaster, event);
        }
    }

    /// Translates one event and broadcasts it; invalid records are logged
    /// and dropped before they reach the broadcaster.
    pub(crate) fn dispatch(broadcaster: &Broadcaster, event: UpstreamEvent) {
        match translate(event.topic, &event.payload) {
            Ok(record) => broadcaster.publish(&record),
            Err(err) => warn!(error = %err, "dropping untranslatable payload"),
        }
    }
}

impl Default for BridgeService {
    fn default() -> Self {
        Self::new()
    }
}
