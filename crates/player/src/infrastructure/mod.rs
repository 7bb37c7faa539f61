pub mod messaging;
pub mod websocket;

// Re-export messaging types
pub use messaging::{ConnectionState, ConnectionStateObserver, EventBus};
pub use websocket::{TransportConfig, TransportManager};
