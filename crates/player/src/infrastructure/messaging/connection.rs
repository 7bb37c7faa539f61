//! Connection lifecycle state.
//!
//! The Transport Manager is the only writer of the connection state; everything
//! else holds a [`ConnectionStateObserver`], a read-only view that can also be
//! awaited for changes.

use std::fmt;

use tokio::sync::watch;

/// Connection state of the single logical channel to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected to the server
    #[default]
    Disconnected,
    /// Socket opening (first attempt or a scheduled reconnect)
    Connecting,
    /// Socket open; frames may be sent
    Connected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create the writer/observer pair for a connection state, starting disconnected.
pub fn connection_state_channel() -> (watch::Sender<ConnectionState>, ConnectionStateObserver) {
    let (tx, rx) = watch::channel(ConnectionState::Disconnected);
    (tx, ConnectionStateObserver::new(rx))
}

/// Observable connection state for UI binding.
///
/// Multiple observers can share the same underlying state; cloning is cheap.
#[derive(Debug, Clone)]
pub struct ConnectionStateObserver {
    rx: watch::Receiver<ConnectionState>,
}

impl ConnectionStateObserver {
    /// Create a new observer from a watch receiver.
    pub fn new(rx: watch::Receiver<ConnectionState>) -> Self {
        Self { rx }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.rx.borrow()
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Wait for the next state change and return the new state.
    ///
    /// Returns `None` once the transport has been dropped.
    pub async fn changed(&mut self) -> Option<ConnectionState> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Wait until the connection is open.
    ///
    /// Returns `false` if the transport was dropped first.
    pub async fn wait_connected(&mut self) -> bool {
        self.rx
            .wait_for(|state| *state == ConnectionState::Connected)
            .await
            .is_ok()
    }
}
