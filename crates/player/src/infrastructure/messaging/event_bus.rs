//! Event Bus for receiving messages from the game server.
//!
//! Each subscriber gets its own unbounded queue, so every subscriber sees every
//! decoded frame exactly once and in arrival order. Subscribers whose receiver
//! has been dropped are pruned on the next dispatch.

use std::sync::{Arc, Mutex, PoisonError};

use tableau_shared::ServerMessage;
use tokio::sync::mpsc;

/// Event bus for inbound server messages.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<ServerMessage>>>>,
}

impl EventBus {
    /// Create a new EventBus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all events from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        rx
    }

    /// Dispatch an event to all live subscribers.
    pub fn dispatch(&self, event: ServerMessage) {
        let mut subscribers = self.lock();
        subscribers.retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<ServerMessage>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
