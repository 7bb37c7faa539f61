//! Shared settings and helpers for the websocket transport.

use std::time::Duration;

use url::Url;

use crate::error::TransportError;

// Reconnection and liveness constants
pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
pub const MAX_RETRY_DELAY_MS: u64 = 5_000;
pub const BACKOFF_MULTIPLIER: u32 = 2;
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Well-known connection path on the page origin
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Timing policy of the Transport Manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Delay before the first reconnect after an unexpected close
    pub initial_backoff: Duration,
    /// Cap on the reconnect delay
    pub max_backoff: Duration,
    /// Interval between liveness probes while connected
    pub heartbeat_interval: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(INITIAL_RETRY_DELAY_MS),
            max_backoff: Duration::from_millis(MAX_RETRY_DELAY_MS),
            heartbeat_interval: Duration::from_secs(HEARTBEAT_INTERVAL_SECS),
        }
    }
}

/// Build the websocket endpoint for `path` on the page `origin`.
///
/// An encrypted origin (`https`) yields `wss`, a plain one (`http`) yields `ws`.
/// Origins that already use a websocket scheme are kept as they are.
pub fn endpoint_url(origin: &Url, path: &str) -> Result<Url, TransportError> {
    let scheme = match origin.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => return Err(TransportError::UnsupportedScheme(other.to_string())),
    };

    let mut endpoint = origin.join(path)?;
    endpoint
        .set_scheme(scheme)
        .map_err(|()| TransportError::UnsupportedScheme(scheme.to_string()))?;
    Ok(endpoint)
}

/// Shorten a frame for log output.
pub fn frame_preview(frame: &str) -> &str {
    const MAX_PREVIEW: usize = 120;
    match frame.char_indices().nth(MAX_PREVIEW) {
        Some((end, _)) => &frame[..end],
        None => frame,
    }
}
