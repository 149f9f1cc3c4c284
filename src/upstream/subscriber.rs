//! MQTT subscriber for the upstream telemetry broker.
//!
//! `UpstreamSubscriber::start` resolves the broker address, establishes the
//! session, and subscribes the fixed topic set; the spawned event loop then
//! decodes inbound publishes into [`UpstreamEvent`]s and keeps the session
//! alive across connection loss. First-connect failures are fatal after a
//! bounded number of retries; later disconnects are retried indefinitely.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rumqttc::Event::{Incoming, Outgoing};
use rumqttc::{AsyncClient, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::UpstreamSettings;
use crate::telemetry::{RawPayload, Topic};
use crate::upstream::directory::EndpointDirectory;
use crate::upstream::event::UpstreamEvent;
use crate::utils::BridgeError;

/// Capacity of the rumqttc request channel.
const EVENT_LOOP_CAPACITY: usize = 10;

/// Phase of the single upstream broker connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    ShuttingDown,
}

/// State shared between the subscriber handle and its event-loop task.
#[derive(Debug)]
struct BrokerConnectionState {
    phase: ConnectionPhase,
    topics: Vec<Topic>,
}

type SharedState = Arc<Mutex<BrokerConnectionState>>;

/// Owns the broker session and its reconnection state machine.
pub struct UpstreamSubscriber {
    client: AsyncClient,
    state: SharedState,
    event_loop_handle: JoinHandle<()>,
}

impl UpstreamSubscriber {
    /// Resolves the broker address, connects, and subscribes `topics`.
    ///
    /// Connect failures retry with exponential backoff up to
    /// `settings.first_connect_retries`; exhausting them surfaces the last
    /// error to the caller instead of retrying forever, so a bridge that
    /// never reached its broker fails loudly at startup. Decoded messages
    /// are emitted on `events` in arrival order.
    pub async fn start<D: EndpointDirectory>(
        directory: &D,
        topics: &[Topic],
        events: UnboundedSender<UpstreamEvent>,
        settings: &UpstreamSettings,
    ) -> Result<Self, BridgeError> {
        let state = Arc::new(Mutex::new(BrokerConnectionState {
            phase: ConnectionPhase::Connecting,
            topics: topics.to_vec(),
        }));

        let mut attempt: u32 = 0;
        let (client, event_loop) = loop {
            match Self::connect(directory, settings).await {
                Ok(pair) => break pair,
                Err(err) if attempt < settings.first_connect_retries => {
                    attempt += 1;
                    let delay = retry_delay(attempt, settings);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "initial broker connect failed, retrying"
                    );
                    time::sleep(delay).await;
                }
                Err(err) => {
                    state.lock().unwrap().phase = ConnectionPhase::Disconnected;
                    error!(error = %err, "exhausted initial broker connect retries");
                    return Err(err);
                }
            }
        };

        for topic in topics {
            client.subscribe(topic.name(), QoS::AtMostOnce).await?;
        }
        state.lock().unwrap().phase = ConnectionPhase::Connected;
        info!(topics = topics.len(), "connected to upstream broker");

        let event_loop_handle = tokio::spawn(Self::run(
            event_loop,
            client.clone(),
            events,
            state.clone(),
            settings.clone(),
        ));

        Ok(Self {
            client,
            state,
            event_loop_handle,
        })
    }

    /// Current phase of the broker connection.
    pub fn phase(&self) -> ConnectionPhase {
        self.state.lock().unwrap().phase
    }

    /// Resolves the broker address and waits for the session to be
    /// acknowledged.
    async fn connect<D: EndpointDirectory>(
        directory: &D,
        settings: &UpstreamSettings,
    ) -> Result<(AsyncClient, EventLoop), BridgeError> {
        let address = directory.resolve().await?;
        let (host, port) = parse_endpoint(&address)?;

        let client_id = format!("{}-{}", settings.client_id_prefix, uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(Duration::from_secs(settings.keep_alive_secs));
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            options.set_credentials(username.clone(), password.clone());
        }

        let (client, mut event_loop) = AsyncClient::new(options, EVENT_LOOP_CAPACITY);

        // Only a ConnAck counts as connected; anything the broker sends
        // before that is still part of session establishment.
        loop {
            match event_loop.poll().await {
                Ok(Incoming(Packet::ConnAck(_))) => return Ok((client, event_loop)),
                Ok(notification) => {
                    debug!(notification = ?notification, "pre-session broker notification");
                }
                Err(err) => return Err(BridgeError::BrokerConnect(err)),
            }
        }
    }

    /// Event loop: decodes publishes, resubscribes after reconnects, and
    /// terminates once a Disconnect has been sent or the bridge is gone.
    async fn run(
        mut event_loop: EventLoop,
        client: AsyncClient,
        events: UnboundedSender<UpstreamEvent>,
        state: SharedState,
        settings: UpstreamSettings,
    ) {
        let mut consecutive_errors: u32 = 0;

        loop {
            match event_loop.poll().await {
                Ok(Incoming(Packet::Publish(publish))) => {
                    consecutive_errors = 0;
                    if Self::shutting_down(&state) {
                        debug!(topic = %publish.topic, "ignoring message during shutdown");
                        continue;
                    }
                    if let Some(event) = decode_publish(&publish.topic, &publish.payload) {
                        if events.send(event).is_err() {
                            info!("bridge channel closed, stopping upstream event loop");
                            break;
                        }
                    }
                }
                Ok(Incoming(Packet::ConnAck(_))) => {
                    consecutive_errors = 0;
                    let reconnecting = {
                        let state = state.lock().unwrap();
                        state.phase == ConnectionPhase::Reconnecting
                    };
                    if reconnecting {
                        let topics = { state.lock().unwrap().topics.clone() };
                        Self::resubscribe(&client, &topics).await;
                        state.lock().unwrap().phase = ConnectionPhase::Connected;
                        info!("upstream broker connection restored");
                    }
                }
                Ok(Incoming(Packet::Disconnect)) => {
                    if Self::shutting_down(&state) {
                        break;
                    }
                    info!("upstream broker sent disconnect");
                }
                Ok(Outgoing(rumqttc::Outgoing::Disconnect)) => {
                    info!("disconnect sent to upstream broker");
                    break;
                }
                Ok(notification) => {
                    consecutive_errors = 0;
                    debug!(notification = ?notification, "broker notification");
                }
                Err(err) => {
                    if Self::shutting_down(&state) {
                        break;
                    }
                    consecutive_errors += 1;
                    state.lock().unwrap().phase = ConnectionPhase::Reconnecting;
                    let delay = retry_delay(consecutive_errors, &settings);
                    warn!(
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "lost upstream broker connection, backing off before reconnect"
                    );
                    time::sleep(delay).await;
                }
            }
        }
        info!("upstream event loop terminated");
    }

    async fn resubscribe(client: &AsyncClient, topics: &[Topic]) {
        for topic in topics {
            if let Err(err) = client.subscribe(topic.name(), QoS::AtMostOnce).await {
                warn!(topic = topic.name(), error = %err, "resubscribe failed");
            }
        }
    }

    fn shutting_down(state: &SharedState) -> bool {
        state.lock().unwrap().phase == ConnectionPhase::ShuttingDown
    }

    /// Cooperative shutdown: unsubscribe, disconnect, and wait for the
    /// event loop to drain. Teardown failures are logged, not propagated.
    pub async fn stop(self) {
        let topics = {
            let mut state = self.state.lock().unwrap();
            state.phase = ConnectionPhase::ShuttingDown;
            state.topics.clone()
        };

        for topic in &topics {
            if let Err(err) = self.client.unsubscribe(topic.name()).await {
                warn!(topic = topic.name(), error = %err, "unsubscribe failed during shutdown");
            }
        }
        if let Err(err) = self.client.disconnect().await {
            warn!(error = %err, "disconnect request failed during shutdown");
        }
        if let Err(err) = self.event_loop_handle.await {
            warn!(error = %err, "upstream event loop task failed");
        }
        info!("upstream subscriber stopped");
    }
}

/// Decodes one inbound publish into a typed event.
///
/// Messages on topics outside the fixed set and bodies that are not JSON
/// objects are logged and dropped; the broker connection is never torn
/// down over a single bad message.
pub(crate) fn decode_publish(topic_name: &str, payload: &[u8]) -> Option<UpstreamEvent> {
    let Some(topic) = Topic::from_name(topic_name) else {
        warn!(topic = topic_name, "ignoring message on unexpected topic");
        return None;
    };
    match serde_json::from_slice::<RawPayload>(payload) {
        Ok(payload) => Some(UpstreamEvent { topic, payload }),
        Err(source) => {
            let err = BridgeError::PayloadDecode {
                topic: topic_name.to_string(),
                source,
            };
            warn!(error = %err, "dropping broker message");
            None
        }
    }
}

/// Splits a resolved `host[:port]` address; the port defaults to 1883.
pub(crate) fn parse_endpoint(address: &str) -> Result<(String, u16), BridgeError> {
    match address.rsplit_once(':') {
        None => Ok((address.to_string(), 1883)),
        Some((host, port)) if !host.is_empty() => port
            .parse::<u16>()
            .map(|port| (host.to_string(), port))
            .map_err(|_| {
                BridgeError::Directory(format!("invalid port in endpoint address '{}'", address))
            }),
        Some(_) => Err(BridgeError::Directory(format!(
            "invalid endpoint address '{}'",
            address
        ))),
    }
}

/// Exponential backoff, capped at `retry_max_ms`.
pub(crate) fn retry_delay(attempt: u32, settings: &UpstreamSettings) -> Duration {
    let initial = Duration::from_millis(settings.retry_initial_ms);
    let max = Duration::from_millis(settings.retry_max_ms);
    let delay = initial * 2_u32.pow(attempt.saturating_sub(1).min(10));
    delay.min(max)
}
