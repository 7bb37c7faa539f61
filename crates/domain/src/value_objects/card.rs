//! Playing card value objects
//!
//! The deck has 40 cards: four suits with values 1 through 10. Cards are plain
//! values with no ownership semantics and are copied freely between the hand,
//! the board and protocol messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Lowest card value in a suit.
pub const MIN_CARD_VALUE: u8 = 1;
/// Highest card value in a suit.
pub const MAX_CARD_VALUE: u8 = 10;

/// Card suit, serialized as its single-letter wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "H")]
    Hearts,
    #[serde(rename = "S")]
    Spades,
    #[serde(rename = "D")]
    Diamonds,
    #[serde(rename = "C")]
    Clubs,
}

impl Suit {
    /// Position of the suit in the global sort order (hearts first, clubs last)
    pub fn rank(&self) -> u8 {
        match self {
            Suit::Hearts => 0,
            Suit::Spades => 1,
            Suit::Diamonds => 2,
            Suit::Clubs => 3,
        }
    }

    /// Single-letter code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Suit::Hearts => "H",
            Suit::Spades => "S",
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Suit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" => Ok(Suit::Hearts),
            "S" => Ok(Suit::Spades),
            "D" => Ok(Suit::Diamonds),
            "C" => Ok(Suit::Clubs),
            other => Err(DomainError::parse(format!("unknown suit code: {other}"))),
        }
    }
}

/// A single playing card.
///
/// Every card, including those decoded from the wire, passes the value
/// range check in [`Card::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    suit: Suit,
    value: u8,
}

/// Unvalidated wire shape of a [`Card`]
#[derive(Deserialize)]
struct RawCard {
    suit: Suit,
    value: u8,
}

impl TryFrom<RawCard> for Card {
    type Error = DomainError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::new(raw.suit, raw.value)
    }
}

impl Card {
    /// Create a card, rejecting values outside 1..=10.
    pub fn new(suit: Suit, value: u8) -> Result<Self, DomainError> {
        if !(MIN_CARD_VALUE..=MAX_CARD_VALUE).contains(&value) {
            return Err(DomainError::validation(format!(
                "card value {value} outside {MIN_CARD_VALUE}..={MAX_CARD_VALUE}"
            )));
        }
        Ok(Self { suit, value })
    }

    /// Global sort position of the card (0-39).
    ///
    /// The game is won when the board, read left to right, is strictly
    /// increasing in this order.
    pub fn sort_index(&self) -> u8 {
        self.suit.rank() * MAX_CARD_VALUE + self.value.saturating_sub(MIN_CARD_VALUE)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suit)
    }
}
