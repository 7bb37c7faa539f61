//! Tableau Protocol - shared types for server and client communication
//!
//! This crate contains the wire contract of the game:
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - The JSON text-frame codec
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and thiserror
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Closed unions** - unknown tags are decode errors, never silently accepted

pub mod codec;
pub mod error;
pub mod messages;

pub use codec::{decode_client, decode_server, encode_client, encode_server};
pub use error::ProtocolError;
pub use messages::{BoardCard, ClientMessage, ServerMessage, HEARTBEAT_PAYLOAD};

pub use tableau_domain::{Card, GamePhase, PlayerNumber, Suit, TurnOrderPreference};
