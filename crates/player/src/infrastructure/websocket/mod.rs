//! WebSocket transport to the game server
//!
//! - `core`: runtime-free lifecycle state machine and backoff
//! - `client`: tokio-tungstenite driver around the core
//! - `shared`: timing constants and endpoint construction

mod client;
mod core;
mod shared;

pub use client::TransportManager;
pub use core::{BackoffState, TransportCore};
pub use shared::{
    endpoint_url, TransportConfig, BACKOFF_MULTIPLIER, DEFAULT_WS_PATH, HEARTBEAT_INTERVAL_SECS,
    INITIAL_RETRY_DELAY_MS, MAX_RETRY_DELAY_MS,
};
