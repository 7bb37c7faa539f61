//! Connection state and inbound event fan-out.
//!
//! - `ConnectionStateObserver`: read-only connection state for the UI
//! - `EventBus`: ordered inbound stream of decoded server messages

pub mod connection;
pub mod event_bus;

pub use connection::{connection_state_channel, ConnectionState, ConnectionStateObserver};
pub use event_bus::EventBus;
