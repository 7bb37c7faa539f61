//! Player seat numbers
//!
//! A session has exactly two seats. The wire carries them as the integers 1
//! and 2, with 0 standing for "nobody" in the fields that allow it; on the
//! Rust side "nobody" is `Option::None`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::DomainError;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerNumber {
    One,
    Two,
}

impl PlayerNumber {
    /// Zero-based index for per-player arrays (`passUsed` and friends)
    pub fn index(self) -> usize {
        match self {
            PlayerNumber::One => 0,
            PlayerNumber::Two => 1,
        }
    }

    /// Wire value (1 or 2)
    pub fn as_u8(self) -> u8 {
        match self {
            PlayerNumber::One => 1,
            PlayerNumber::Two => 2,
        }
    }

    /// Interpret a wire value where 0 means "nobody".
    pub fn from_wire(value: u8) -> Result<Option<Self>, DomainError> {
        match value {
            0 => Ok(None),
            other => Self::try_from(other).map(Some),
        }
    }
}

impl TryFrom<u8> for PlayerNumber {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PlayerNumber::One),
            2 => Ok(PlayerNumber::Two),
            other => Err(DomainError::validation(format!(
                "player number must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<PlayerNumber> for u8 {
    fn from(player: PlayerNumber) -> Self {
        player.as_u8()
    }
}

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Serde helper for optional seat fields where the wire uses 0 (or omission) for "nobody".
pub fn deserialize_optional_player<'de, D>(
    deserializer: D,
) -> Result<Option<PlayerNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<u8>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => PlayerNumber::from_wire(value).map_err(serde::de::Error::custom),
    }
}
