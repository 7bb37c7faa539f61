//! Game View State
//!
//! The snapshot external view code reads. The session task is its only writer.

pub mod board;
pub mod game_view;

pub use board::{Board, BoardSlot};
pub use game_view::{
    GameViewState, RevealProgress, SessionIdentity, SwapNegotiation, SwapRecord, TurnOrderOutcome,
};
