//! Runtime-free core of the Transport Manager.
//!
//! This is deliberately free of sockets and timers. The async client owns the
//! actual socket and the sleeping, and calls into [`TransportCore`] for every
//! lifecycle decision: which state to publish, whether a close should be
//! followed by a reconnect, and how long to wait before it.
//!
//! Every `connect()` and `disconnect()` starts a new *epoch*. Socket events
//! carry the epoch they were started under; events from an older epoch are
//! stale and ignored, which is what keeps an explicit disconnect from ever
//! being followed by a reconnect.

use std::time::Duration;

use super::shared::{TransportConfig, BACKOFF_MULTIPLIER};
use crate::infrastructure::messaging::ConnectionState;

/// Exponential backoff state for reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffState {
    initial: Duration,
    max: Duration,
    delay: Duration,
}

impl BackoffState {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            delay: initial.min(max),
        }
    }

    pub fn reset(&mut self) {
        self.delay = self.initial.min(self.max);
    }

    /// Delay the next reconnect would wait.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Take the current delay and double it (capped) for the attempt after.
    pub fn next_delay_and_advance(&mut self) -> Duration {
        let current = self.delay;
        self.delay = current.saturating_mul(BACKOFF_MULTIPLIER).min(self.max);
        current
    }
}

/// Lifecycle state machine of the transport.
#[derive(Debug, Clone)]
pub struct TransportCore {
    state: ConnectionState,
    backoff: BackoffState,
    epoch: u64,
    intentional_close: bool,
    reconnect_pending: bool,
    heartbeat_active: bool,
}

impl TransportCore {
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            backoff: BackoffState::new(config.initial_backoff, config.max_backoff),
            epoch: 0,
            intentional_close: false,
            reconnect_pending: false,
            heartbeat_active: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn backoff(&self) -> &BackoffState {
        &self.backoff
    }

    /// Whether a reconnect timer or heartbeat is still armed.
    pub fn has_pending_timers(&self) -> bool {
        self.reconnect_pending || self.heartbeat_active
    }

    /// Frames may only be written while connected.
    pub fn can_send(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Whether events tagged with `epoch` still belong to the live lifecycle.
    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch && !self.intentional_close
    }

    /// Start a fresh lifecycle: tear down whatever existed, then begin opening.
    ///
    /// Returns the epoch of the new lifecycle.
    pub fn connect(&mut self) -> u64 {
        self.disconnect();
        self.intentional_close = false;
        self.state = ConnectionState::Connecting;
        self.epoch
    }

    /// Intentional close: cancel timers, suppress reconnection.
    pub fn disconnect(&mut self) {
        self.intentional_close = true;
        self.reconnect_pending = false;
        self.heartbeat_active = false;
        self.backoff.reset();
        self.state = ConnectionState::Disconnected;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// The endpoint could not even be constructed; there is nothing to retry.
    pub fn construction_failed(&mut self, epoch: u64) {
        if self.is_current(epoch) {
            self.disconnect();
        }
    }

    /// The socket opened. Returns `false` if the event is stale.
    pub fn on_open(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) || self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::Connected;
        self.backoff.reset();
        self.heartbeat_active = true;
        true
    }

    /// The socket closed, or failed to open.
    ///
    /// Returns the delay before the next attempt, or `None` when no reconnect
    /// should happen (stale event or intentional close).
    pub fn on_close(&mut self, epoch: u64) -> Option<Duration> {
        if !self.is_current(epoch) {
            return None;
        }
        self.state = ConnectionState::Disconnected;
        self.heartbeat_active = false;
        self.reconnect_pending = true;
        Some(self.backoff.next_delay_and_advance())
    }

    /// The reconnect timer fired. Returns `false` if it was cancelled meanwhile.
    pub fn on_reconnect_due(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) || !self.reconnect_pending {
            return false;
        }
        self.reconnect_pending = false;
        self.state = ConnectionState::Connecting;
        true
    }
}
