//! Transport Port - the single logical channel to the game server

use tokio::sync::mpsc;

use tableau_shared::{ClientMessage, ServerMessage};

use crate::infrastructure::messaging::{ConnectionState, ConnectionStateObserver};
use crate::infrastructure::websocket::TransportManager;

/// Port for the connection to the server.
///
/// Outbound messages are fire-and-forget: anything sent while not connected
/// is dropped. Inbound messages arrive in order on the receivers returned by
/// [`GameTransport::subscribe`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait GameTransport: Send + Sync {
    /// Current connection state
    fn state(&self) -> ConnectionState;

    /// Read-only, awaitable view of the connection state
    fn observe(&self) -> ConnectionStateObserver;

    /// Open (or reopen) the channel at `path` on the page origin
    fn connect(&self, path: &str);

    /// Close the channel on purpose; no reconnect follows
    fn disconnect(&self);

    /// Write a message if connected
    fn send(&self, message: ClientMessage);

    /// Register for inbound messages
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ServerMessage>;
}

impl GameTransport for TransportManager {
    fn state(&self) -> ConnectionState {
        TransportManager::state(self)
    }

    fn observe(&self) -> ConnectionStateObserver {
        TransportManager::observe(self)
    }

    fn connect(&self, path: &str) {
        TransportManager::connect(self, path)
    }

    fn disconnect(&self) {
        TransportManager::disconnect(self)
    }

    fn send(&self, message: ClientMessage) {
        TransportManager::send(self, message)
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ServerMessage> {
        TransportManager::subscribe(self)
    }
}
