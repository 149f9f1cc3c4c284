use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::registry::connection::{ClientConnection, ConnectionState};
use crate::utils::BridgeError;

/// Registry handle shared between the accept loop, the per-connection
/// tasks, and the broadcaster.
pub type SharedRegistry = Arc<Mutex<ConnectionRegistry>>;

/// Tracks every open subscriber connection.
///
/// The registry is the single owner of [`ClientConnection`] values. All
/// mutation happens behind one mutex held only for non-suspending map
/// operations, so a connection accepted while a broadcast holds the lock
/// simply misses that frame.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, ClientConnection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Adds a new open connection and returns its id.
    pub fn register(&mut self, connection: ClientConnection) -> String {
        let id = connection.id.clone();
        self.connections.insert(id.clone(), connection);
        info!(connection = %id, subscribers = self.connections.len(), "subscriber registered");
        id
    }

    /// Marks a connection closed and removes it.
    ///
    /// Idempotent: unregistering an id that is no longer tracked is a no-op.
    pub fn unregister(&mut self, id: &str) {
        if let Some(mut connection) = self.connections.remove(id) {
            connection.state = ConnectionState::Closed;
            info!(connection = %id, subscribers = self.connections.len(), "subscriber removed");
        }
    }

    /// Sends `frame` to every connection currently open.
    ///
    /// Best effort: a send failure closes and removes that one connection
    /// and never aborts delivery to the rest.
    pub fn broadcast(&mut self, frame: WsMessage) {
        let mut failed = Vec::new();
        for (id, connection) in &self.connections {
            if !connection.is_open() {
                continue;
            }
            if let Err(e) = connection.sender.send(frame.clone()) {
                let err = BridgeError::SubscriberSend {
                    connection: id.clone(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "dropping subscriber after failed send");
                failed.push(id.clone());
            }
        }
        for id in failed {
            if let Some(connection) = self.connections.get_mut(&id) {
                connection.state = ConnectionState::Closed;
            }
            self.connections.remove(&id);
        }
    }

    /// Tears down every remaining connection.
    ///
    /// Dropping the senders ends each connection's send loop, which closes
    /// the underlying socket.
    pub fn close_all(&mut self) {
        for connection in self.connections.values_mut() {
            connection.state = ConnectionState::Closing;
        }
        let drained = self.connections.len();
        self.connections.clear();
        debug!(subscribers = drained, "closed all subscriber connections");
    }

    /// Number of connections currently open.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Whether `id` is still tracked.
    pub fn contains(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }
}
