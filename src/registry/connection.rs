use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;

/// Lifecycle of a subscriber connection.
///
/// A connection is `Open` from accept until it disconnects or a send to it
/// fails, `Closing` while the bridge tears it down, and `Closed` once the
/// registry lets go of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closing,
    Closed,
}

/// One accepted subscriber link.
///
/// Identified by an id unique within the process lifetime, with a channel
/// (`sender`) for pushing frames to the connection's write task.
#[derive(Debug)]
pub struct ClientConnection {
    /// Unique identifier for the connection.
    pub id: String,
    /// Channel to the connection's WebSocket send loop.
    pub sender: UnboundedSender<WsMessage>,
    /// Current lifecycle state.
    pub state: ConnectionState,
}

impl ClientConnection {
    /// Creates a new open connection with a freshly minted id.
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: format!("subscriber-{}", uuid::Uuid::new_v4()),
            sender,
            state: ConnectionState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }
}
