//! Tableau Domain - vocabulary types for the two-player card game
//!
//! Pure value objects with no I/O: cards, seats, phases and the fixed
//! table dimensions. Both the wire protocol and the client engine build on
//! these types.

pub mod error;
pub mod value_objects;

pub use error::DomainError;
pub use value_objects::{
    deserialize_optional_player, Card, GamePhase, PlayerNumber, Suit, TurnOrderPreference,
    MAX_CARD_VALUE, MIN_CARD_VALUE,
};

/// Number of slots on the shared board
pub const BOARD_SIZE: usize = 15;

/// Number of cards dealt to each player
pub const HAND_SIZE: usize = 7;

/// Number of seats at the table
pub const PLAYER_COUNT: usize = 2;
