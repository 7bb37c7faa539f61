//! Tableau Player - client session engine.
//!
//! - `infrastructure`: the Transport Manager (websocket lifecycle, heartbeat,
//!   reconnect backoff) and the inbound event bus
//! - `state`: the Game View State read by view code
//! - `application`: the Game Phase Reducer and the session task driving it
//! - `ports`: the seams the session talks through

pub mod application;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod ports;
pub mod state;

pub use application::{GamePhaseReducer, GameSession, UserIntent};
pub use config::ClientConfig;
pub use error::{ConfigError, TransportError};
pub use infrastructure::{ConnectionState, TransportManager};
pub use state::GameViewState;
