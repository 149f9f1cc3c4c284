use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::registry::{ClientConnection, SharedRegistry};

/// Accepts subscriber connections on `addr` and registers each with the
/// registry. Runs until the process shuts down.
pub async fn start_subscriber_server(addr: String, registry: SharedRegistry) {
    let listener = TcpListener::bind(addr.clone()).await.expect("Can't bind");

    info!("subscriber endpoint listening on ws://{addr}");

    while let Ok((stream, _)) = listener.accept().await {
        let registry = registry.clone();
        spawn(async move {
            handle_connection(stream, registry).await;
        });
    }
}

async fn handle_connection(stream: TcpStream, registry: SharedRegistry) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let connection = ClientConnection::new(tx);
    let connection_id = connection.id.clone();
    registry.lock().unwrap().register(connection);

    // Forward broadcast frames from the registry channel to the socket.
    // A write failure means the subscriber is gone or too slow; drop it.
    {
        let registry = registry.clone();
        let connection_id = connection_id.clone();
        spawn(async move {
            while let Some(frame) = rx.recv().await {
                if let Err(e) = ws_sender.send(frame).await {
                    warn!(connection = %connection_id, error = %e, "send failed, dropping subscriber");
                    break;
                }
            }
            registry.lock().unwrap().unregister(&connection_id);
            debug!(connection = %connection_id, "send loop closed");
        });
    }

    // Subscribers have nothing to say to the bridge; drain the socket so
    // close frames and disconnects are noticed, ignore everything else.
    while let Some(Ok(frame)) = ws_receiver.next().await {
        if frame.is_close() {
            break;
        }
        debug!(connection = %connection_id, "ignoring inbound frame from subscriber");
    }

    info!(connection = %connection_id, "subscriber disconnected");
    registry.lock().unwrap().unregister(&connection_id);
}
