//! Observable snapshot of one player's game session
//!
//! `GameViewState` holds data only. Every mutator applies one logical update
//! and enforces the field invariants (monotonic `hand_used` and `pass_used`,
//! no disclosed card on an empty slot); all game rules live in the reducer.

use serde::Serialize;

use tableau_domain::{
    Card, GamePhase, PlayerNumber, TurnOrderPreference, HAND_SIZE, PLAYER_COUNT,
};
use tableau_shared::BoardCard;

use super::board::Board;

/// Who we are in the current room.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub player_name: String,
    pub player_number: Option<PlayerNumber>,
    pub partner_name: String,
    pub room_code: String,
}

/// A swap proposal awaiting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapNegotiation {
    pub pending: bool,
    pub slots: Option<(usize, usize)>,
    pub suggester: Option<PlayerNumber>,
}

/// An accepted swap, kept for the rest of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRecord {
    pub slot_a: usize,
    pub slot_b: usize,
    pub by_player: Option<PlayerNumber>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealProgress {
    pub revealed_count: usize,
    pub total_reveal_cards: usize,
}

/// Both turn-order picks as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOrderOutcome {
    pub pick1: TurnOrderPreference,
    pub pick2: TurnOrderPreference,
    pub conflict: bool,
    pub first_player: Option<PlayerNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameViewState {
    identity: SessionIdentity,
    phase: GamePhase,
    board: Board,
    hand: Vec<Card>,
    hand_used: [bool; HAND_SIZE],
    selected_card: Option<usize>,
    armed_swap_slot: Option<usize>,
    current_turn: Option<PlayerNumber>,
    first_player: Option<PlayerNumber>,
    is_my_turn: bool,
    pass_used: [bool; PLAYER_COUNT],
    swap: SwapNegotiation,
    swap_history: Vec<SwapRecord>,
    reveal: RevealProgress,
    turn_order_result: Option<TurnOrderOutcome>,
    my_pick: Option<TurnOrderPreference>,
    game_won: Option<bool>,
    final_board: Vec<BoardCard>,
    awaiting_join: bool,
    join_error: Option<String>,
    partner_disconnected: bool,
    partner_wants_rematch: bool,
    rematch_requested: bool,
    disclosure_generation: u64,
}

impl Default for GameViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameViewState {
    /// Lobby-time defaults
    pub fn new() -> Self {
        Self {
            identity: SessionIdentity::default(),
            phase: GamePhase::Lobby,
            board: Board::new(),
            hand: Vec::new(),
            hand_used: [false; HAND_SIZE],
            selected_card: None,
            armed_swap_slot: None,
            current_turn: None,
            first_player: None,
            is_my_turn: false,
            pass_used: [false; PLAYER_COUNT],
            swap: SwapNegotiation::default(),
            swap_history: Vec::new(),
            reveal: RevealProgress::default(),
            turn_order_result: None,
            my_pick: None,
            game_won: None,
            final_board: Vec::new(),
            awaiting_join: false,
            join_error: None,
            partner_disconnected: false,
            partner_wants_rematch: false,
            rematch_requested: false,
            disclosure_generation: 0,
        }
    }

    /// Restore every field to its lobby-time default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Clear everything tied to the finished game, keeping who we are.
    pub fn reset_for_rematch(&mut self) {
        let identity = std::mem::take(&mut self.identity);
        let partner_disconnected = self.partner_disconnected;
        let disclosure_generation = self.disclosure_generation;
        *self = Self::new();
        self.identity = identity;
        self.partner_disconnected = partner_disconnected;
        self.disclosure_generation = disclosure_generation;
    }

    // ---- read side -------------------------------------------------------

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_used(&self) -> &[bool; HAND_SIZE] {
        &self.hand_used
    }

    pub fn is_hand_card_available(&self, index: usize) -> bool {
        index < self.hand.len() && !self.hand_used.get(index).copied().unwrap_or(true)
    }

    pub fn selected_card(&self) -> Option<usize> {
        self.selected_card
    }

    pub fn armed_swap_slot(&self) -> Option<usize> {
        self.armed_swap_slot
    }

    pub fn current_turn(&self) -> Option<PlayerNumber> {
        self.current_turn
    }

    pub fn first_player(&self) -> Option<PlayerNumber> {
        self.first_player
    }

    pub fn is_my_turn(&self) -> bool {
        self.is_my_turn
    }

    pub fn pass_used(&self) -> &[bool; PLAYER_COUNT] {
        &self.pass_used
    }

    pub fn swap(&self) -> &SwapNegotiation {
        &self.swap
    }

    pub fn swap_history(&self) -> &[SwapRecord] {
        &self.swap_history
    }

    pub fn reveal(&self) -> &RevealProgress {
        &self.reveal
    }

    pub fn turn_order_result(&self) -> Option<&TurnOrderOutcome> {
        self.turn_order_result.as_ref()
    }

    pub fn my_pick(&self) -> Option<TurnOrderPreference> {
        self.my_pick
    }

    pub fn game_won(&self) -> Option<bool> {
        self.game_won
    }

    pub fn final_board(&self) -> &[BoardCard] {
        &self.final_board
    }

    pub fn awaiting_join(&self) -> bool {
        self.awaiting_join
    }

    pub fn join_error(&self) -> Option<&str> {
        self.join_error.as_deref()
    }

    pub fn partner_disconnected(&self) -> bool {
        self.partner_disconnected
    }

    pub fn partner_wants_rematch(&self) -> bool {
        self.partner_wants_rematch
    }

    pub fn rematch_requested(&self) -> bool {
        self.rematch_requested
    }

    // ---- identity --------------------------------------------------------

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.identity.player_name = name.into();
    }

    pub fn set_player_number(&mut self, player: PlayerNumber) {
        self.identity.player_number = Some(player);
    }

    pub fn set_partner_name(&mut self, name: impl Into<String>) {
        self.identity.partner_name = name.into();
    }

    pub fn set_room_code(&mut self, code: impl Into<String>) {
        self.identity.room_code = code.into();
    }

    pub fn set_awaiting_join(&mut self, awaiting: bool) {
        self.awaiting_join = awaiting;
    }

    pub fn set_join_error(&mut self, error: Option<String>) {
        self.join_error = error;
    }

    pub fn set_partner_disconnected(&mut self, disconnected: bool) {
        self.partner_disconnected = disconnected;
    }

    // ---- phase and turn --------------------------------------------------

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    pub fn set_current_turn(&mut self, player: Option<PlayerNumber>) {
        self.current_turn = player;
    }

    pub fn set_first_player(&mut self, player: Option<PlayerNumber>) {
        self.first_player = player;
    }

    pub fn set_my_turn(&mut self, mine: bool) {
        self.is_my_turn = mine;
    }

    /// Once set for a player, stays set until a reset.
    pub fn mark_pass_used(&mut self, player: PlayerNumber) {
        self.pass_used[player.index()] = true;
    }

    pub fn set_turn_order_result(&mut self, outcome: Option<TurnOrderOutcome>) {
        self.turn_order_result = outcome;
    }

    pub fn set_my_pick(&mut self, pick: Option<TurnOrderPreference>) {
        self.my_pick = pick;
    }

    // ---- hand ------------------------------------------------------------

    /// Replace the hand; all cards become available again.
    pub fn set_hand(&mut self, hand: Vec<Card>) {
        self.hand = hand;
        self.hand.truncate(HAND_SIZE);
        self.hand_used = [false; HAND_SIZE];
        self.selected_card = None;
    }

    /// Once set for an index, stays set until the hand is replaced.
    pub fn mark_hand_used(&mut self, index: usize) {
        if let Some(used) = self.hand_used.get_mut(index) {
            *used = true;
        }
    }

    pub fn set_selected_card(&mut self, index: Option<usize>) {
        self.selected_card = index;
    }

    // ---- board -----------------------------------------------------------

    pub fn place_on_board(&mut self, slot: usize, player: PlayerNumber) -> bool {
        self.board.place(slot, player)
    }

    /// Show `card` on `slot` and return the disclosure's generation.
    pub fn disclose(&mut self, slot: usize, card: Card) -> Option<u64> {
        let generation = self.disclosure_generation + 1;
        if !self.board.disclose(slot, card, generation) {
            return None;
        }
        self.disclosure_generation = generation;
        Some(generation)
    }

    /// Hide the disclosure stamped `generation`; returns the slot it sat on.
    pub fn hide_disclosure(&mut self, generation: u64) -> Option<usize> {
        self.board.hide_generation(generation)
    }

    pub fn swap_board_slots(&mut self, a: usize, b: usize) -> bool {
        self.board.swap(a, b)
    }

    // ---- swap negotiation ------------------------------------------------

    pub fn set_armed_swap_slot(&mut self, slot: Option<usize>) {
        self.armed_swap_slot = slot;
    }

    pub fn set_swap_pending(&mut self, slot_a: usize, slot_b: usize, suggester: PlayerNumber) {
        self.swap = SwapNegotiation {
            pending: true,
            slots: Some((slot_a, slot_b)),
            suggester: Some(suggester),
        };
    }

    pub fn clear_swap(&mut self) {
        self.swap = SwapNegotiation::default();
        self.armed_swap_slot = None;
    }

    pub fn record_swap(&mut self, record: SwapRecord) {
        self.swap_history.push(record);
    }

    // ---- reveal and result -----------------------------------------------

    pub fn begin_reveal(&mut self) {
        self.phase = GamePhase::Reveal;
        self.reveal = RevealProgress::default();
    }

    pub fn expect_reveal_card(&mut self) {
        self.reveal.total_reveal_cards += 1;
    }

    pub fn count_revealed_card(&mut self) {
        self.reveal.revealed_count += 1;
    }

    pub fn set_game_won(&mut self, won: bool) {
        self.game_won = Some(won);
    }

    pub fn set_final_board(&mut self, board: Vec<BoardCard>) {
        self.final_board = board;
    }

    pub fn set_partner_wants_rematch(&mut self, wants: bool) {
        self.partner_wants_rematch = wants;
    }

    pub fn set_rematch_requested(&mut self, requested: bool) {
        self.rematch_requested = requested;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_domain::Suit;

    fn hand() -> Vec<Card> {
        (1..=7)
            .map(|value| Card::new(Suit::Spades, value).expect("valid card"))
            .collect()
    }

    #[test]
    fn defaults_are_lobby_time_values() {
        let view = GameViewState::new();
        assert_eq!(view.phase(), GamePhase::Lobby);
        assert_eq!(view.board().len(), 15);
        assert!(view.hand().is_empty());
        assert_eq!(view.hand_used(), &[false; 7]);
        assert_eq!(view.pass_used(), &[false, false]);
        assert_eq!(view.identity().player_number, None);
    }

    #[test]
    fn rematch_reset_keeps_identity_only() {
        let mut view = GameViewState::new();
        view.set_player_name("Ada");
        view.set_player_number(PlayerNumber::Two);
        view.set_partner_name("Grace");
        view.set_room_code("QX7P");
        view.set_hand(hand());
        view.mark_hand_used(3);
        view.place_on_board(6, PlayerNumber::One);
        view.mark_pass_used(PlayerNumber::One);
        view.begin_reveal();
        view.expect_reveal_card();
        view.set_game_won(true);
        view.set_phase(GamePhase::GameOver);

        view.reset_for_rematch();

        assert_eq!(view.identity().player_name, "Ada");
        assert_eq!(view.identity().partner_name, "Grace");
        assert_eq!(view.identity().player_number, Some(PlayerNumber::Two));
        assert_eq!(view.identity().room_code, "QX7P");
        assert!(view.board().is_empty());
        assert!(view.hand().is_empty());
        assert_eq!(view.pass_used(), &[false, false]);
        assert_eq!(view.reveal(), &RevealProgress::default());
        assert_eq!(view.game_won(), None);
    }

    #[test]
    fn full_reset_clears_identity() {
        let mut view = GameViewState::new();
        view.set_player_name("Ada");
        view.set_room_code("QX7P");
        view.reset();
        assert_eq!(view, GameViewState::new());
    }

    #[test]
    fn new_hand_frees_every_card() {
        let mut view = GameViewState::new();
        view.set_hand(hand());
        view.mark_hand_used(0);
        view.set_selected_card(Some(1));
        assert!(!view.is_hand_card_available(0));

        view.set_hand(hand());
        assert!(view.is_hand_card_available(0));
        assert_eq!(view.selected_card(), None);
        assert!(!view.is_hand_card_available(7));
    }

    #[test]
    fn disclosures_get_increasing_generations() {
        let mut view = GameViewState::new();
        let card = Card::new(Suit::Clubs, 2).expect("valid card");
        let first = view.disclose(1, card).expect("in range");
        let second = view.disclose(1, card).expect("in range");
        assert!(second > first);
        assert_eq!(view.disclose(99, card), None);
    }
}
