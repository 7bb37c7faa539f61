//! The 15-slot board as seen by one player

use serde::Serialize;

use tableau_domain::{Card, PlayerNumber, BOARD_SIZE};

/// One board position.
///
/// `card` is only set while a peek or the final reveal discloses it, and is
/// never set on an unoccupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSlot {
    pub occupied: bool,
    pub by_player: Option<PlayerNumber>,
    pub card: Option<Card>,
    /// Generation of the disclosure currently shown, 0 if none ever was
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    slots: Vec<BoardSlot>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Fifteen empty slots
    pub fn new() -> Self {
        Self {
            slots: vec![BoardSlot::default(); BOARD_SIZE],
        }
    }

    pub fn slots(&self) -> &[BoardSlot] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&BoardSlot> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| !slot.occupied)
    }

    /// Put a face-down card on `slot`. Returns `false` if the index is out of range.
    pub fn place(&mut self, slot: usize, player: PlayerNumber) -> bool {
        let Some(target) = self.slots.get_mut(slot) else {
            return false;
        };
        target.occupied = true;
        target.by_player = Some(player);
        target.card = None;
        true
    }

    /// Show `card` on `slot` under disclosure `generation`.
    pub fn disclose(&mut self, slot: usize, card: Card, generation: u64) -> bool {
        let Some(target) = self.slots.get_mut(slot) else {
            return false;
        };
        target.occupied = true;
        target.card = Some(card);
        target.generation = generation;
        true
    }

    /// Hide the card shown under `generation`, wherever swaps have moved it.
    ///
    /// Returns the slot that was hidden, or `None` if a newer disclosure
    /// replaced it.
    pub fn hide_generation(&mut self, generation: u64) -> Option<usize> {
        let (slot, target) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.generation == generation && slot.card.is_some())?;
        target.card = None;
        Some(slot)
    }

    /// Exchange the full contents of two slots.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= self.slots.len() || b >= self.slots.len() {
            return false;
        }
        self.slots.swap(a, b);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
