//! Value objects shared by the protocol and the client engine

mod card;
mod phase;
mod player;

pub use card::{Card, Suit, MAX_CARD_VALUE, MIN_CARD_VALUE};
pub use phase::{GamePhase, TurnOrderPreference};
pub use player::{deserialize_optional_player, PlayerNumber};
