//! Game phase and turn-order vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Coarse stage of a game session.
///
/// `Lobby -> TurnOrderPick -> Placement <-> Swap -> Reveal -> GameOver`, with
/// a rematch path from `GameOver` back to `TurnOrderPick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Lobby,
    TurnOrderPick,
    Placement,
    Swap,
    Reveal,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Lobby => "lobby",
            GamePhase::TurnOrderPick => "turn_order_pick",
            GamePhase::Placement => "placement",
            GamePhase::Swap => "swap",
            GamePhase::Reveal => "reveal",
            GamePhase::GameOver => "game_over",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A player's preference when the server asks who should place first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrderPreference {
    First,
    Neutral,
    NoFirst,
}

impl TurnOrderPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnOrderPreference::First => "first",
            TurnOrderPreference::Neutral => "neutral",
            TurnOrderPreference::NoFirst => "no_first",
        }
    }
}

impl fmt::Display for TurnOrderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TurnOrderPreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(TurnOrderPreference::First),
            "neutral" => Ok(TurnOrderPreference::Neutral),
            "no_first" | "second" => Ok(TurnOrderPreference::NoFirst),
            other => Err(DomainError::parse(format!(
                "unknown turn order preference: {other}"
            ))),
        }
    }
}
