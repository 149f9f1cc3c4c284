use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::Number;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::connect_async;
use tungstenite::protocol::Message as WsMessage;

use crate::broadcast::Broadcaster;
use crate::registry::{ConnectionRegistry, SharedRegistry};
use crate::telemetry::CanonicalRecord;
use crate::transport::websocket::start_subscriber_server;

async fn start_server() -> (String, SharedRegistry) {
    let registry: SharedRegistry = Arc::new(Mutex::new(ConnectionRegistry::new()));
    let addr = format!(
        "127.0.0.1:{}",
        portpicker::pick_unused_port().expect("No free ports")
    );

    tokio::spawn(start_subscriber_server(addr.clone(), registry.clone()));

    // Give the server a moment to start up
    sleep(Duration::from_millis(100)).await;

    (addr, registry)
}

async fn wait_for_subscribers(registry: &SharedRegistry, expected: usize) {
    for _ in 0..200 {
        if registry.lock().unwrap().len() == expected {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "registry never reached {} subscribers (currently {})",
        expected,
        registry.lock().unwrap().len()
    );
}

async fn next_text(
    ws: &mut (impl Stream<Item = Result<WsMessage, tungstenite::Error>> + Unpin),
) -> String {
    loop {
        let frame = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("stream errored");
        if let WsMessage::Text(text) = frame {
            return text.as_str().to_string();
        }
    }
}

#[tokio::test]
async fn test_subscriber_receives_broadcast_frame() {
    let (addr, registry) = start_server().await;

    let (mut ws, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("client connect");
    wait_for_subscribers(&registry, 1).await;

    let broadcaster = Broadcaster::new(registry.clone());
    broadcaster.publish(&CanonicalRecord::TempHumidity {
        temp: Number::from_f64(21.5).unwrap(),
        humidity: Number::from(40),
    });

    assert_eq!(
        next_text(&mut ws).await,
        r#"{"topic":"dronesense/temp-humidity","temp":21.5,"humidity":40}"#
    );
}

#[tokio::test]
async fn test_closed_subscriber_does_not_block_the_rest() {
    let (addr, registry) = start_server().await;

    let (mut ws_a, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("client A connect");
    let (mut ws_b, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("client B connect");
    wait_for_subscribers(&registry, 2).await;

    ws_a.close(None).await.expect("close client A");
    wait_for_subscribers(&registry, 1).await;

    registry
        .lock()
        .unwrap()
        .broadcast(WsMessage::text(r#"{"topic":"dronesense/gps","lat":51.5,"lon":-0.12}"#));

    assert_eq!(
        next_text(&mut ws_b).await,
        r#"{"topic":"dronesense/gps","lat":51.5,"lon":-0.12}"#
    );
}

#[tokio::test]
async fn test_inbound_frames_are_ignored_without_disconnect() {
    let (addr, registry) = start_server().await;

    let (mut ws, _) = connect_async(format!("ws://{addr}"))
        .await
        .expect("client connect");
    wait_for_subscribers(&registry, 1).await;

    ws.send(WsMessage::text(r#"{"type":"subscribe","topic":"anything"}"#))
        .await
        .expect("send inbound frame");
    sleep(Duration::from_millis(100)).await;

    // Still registered, still receiving.
    assert_eq!(registry.lock().unwrap().len(), 1);
    registry.lock().unwrap().broadcast(WsMessage::text("frame"));
    assert_eq!(next_text(&mut ws).await, "frame");
}
