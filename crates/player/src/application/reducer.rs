//! Game Phase Reducer
//!
//! Folds inbound server messages, user intents and fired follow-ups into the
//! [`GameViewState`], one at a time, and returns the effects the session must
//! carry out. Every fold is total: an event that does not apply to the current
//! phase is ignored, never an error.

use std::time::Duration;

use tableau_domain::{Card, GamePhase, PlayerNumber, TurnOrderPreference};
use tableau_shared::{BoardCard, ClientMessage, ServerMessage};

use super::effects::{Effect, FollowUp};
use super::intents::UserIntent;
use super::settings::ReducerSettings;
use crate::state::{GameViewState, SwapRecord, TurnOrderOutcome};

#[derive(Debug, Clone, Default)]
pub struct GamePhaseReducer {
    settings: ReducerSettings,
}

impl GamePhaseReducer {
    pub fn new(settings: ReducerSettings) -> Self {
        Self { settings }
    }

    // =========================================================================
    // Server events
    // =========================================================================

    pub fn apply_server(&self, view: &mut GameViewState, message: ServerMessage) -> Vec<Effect> {
        tracing::debug!(
            kind = message.type_name(),
            phase = %view.phase(),
            "Folding server message"
        );

        match message {
            ServerMessage::Echo { .. } => Vec::new(),
            ServerMessage::Error { message } => {
                if view.awaiting_join() {
                    view.set_join_error(Some(message));
                } else {
                    tracing::debug!(%message, "Ignoring server error outside the join flow");
                }
                Vec::new()
            }
            ServerMessage::RoomCreated {
                room_code,
                player_number,
            } => {
                view.set_room_code(room_code);
                view.set_player_number(player_number);
                Self::join_settled(view);
                Vec::new()
            }
            ServerMessage::PlayerJoined {
                player_name,
                player_number,
                partner_name,
            } => {
                view.set_player_name(player_name);
                view.set_player_number(player_number);
                view.set_partner_name(partner_name);
                Self::join_settled(view);
                // Both seats are filled again.
                view.set_partner_disconnected(false);
                Vec::new()
            }
            ServerMessage::PlayerDisconnected { player_name } => {
                let partner = &view.identity().partner_name;
                if !partner.is_empty() && *partner == player_name {
                    view.set_partner_disconnected(true);
                }
                Vec::new()
            }
            ServerMessage::TurnOrderPrompt { hand } => self.turn_order_prompt(view, hand),
            ServerMessage::TurnOrderResult {
                pick1,
                pick2,
                conflict,
                first_player,
            } => {
                if view.phase() != GamePhase::TurnOrderPick {
                    tracing::debug!(phase = %view.phase(), "Ignoring turn order result");
                    return Vec::new();
                }
                view.set_turn_order_result(Some(TurnOrderOutcome {
                    pick1,
                    pick2,
                    conflict,
                    first_player,
                }));
                if conflict {
                    view.set_my_pick(None);
                }
                if first_player.is_some() {
                    view.set_first_player(first_player);
                }
                Vec::new()
            }
            ServerMessage::GameStart { hand, first_player } => {
                view.set_hand(hand);
                view.set_first_player(Some(first_player));
                view.set_current_turn(Some(first_player));
                view.set_my_turn(false);
                view.set_phase(GamePhase::Placement);
                Vec::new()
            }
            ServerMessage::YourTurn => {
                view.set_my_turn(true);
                Vec::new()
            }
            ServerMessage::CardPlaced {
                slot_index,
                by_player,
            } => {
                if !view.place_on_board(slot_index, by_player) {
                    tracing::warn!(slot_index, "card_placed outside the board");
                }
                view.set_my_turn(false);
                Vec::new()
            }
            ServerMessage::PlayerPassed { by_player } => {
                view.mark_pass_used(by_player);
                view.set_my_turn(false);
                Vec::new()
            }
            ServerMessage::PeekResult { slot_index, card } => {
                match view.disclose(slot_index, card) {
                    Some(generation) => vec![Effect::Schedule {
                        delay: self.settings.timing.peek_hide,
                        follow_up: FollowUp::HidePeek {
                            slot: slot_index,
                            generation,
                        },
                    }],
                    None => {
                        tracing::warn!(slot_index, "peek_result outside the board");
                        Vec::new()
                    }
                }
            }
            ServerMessage::SwapPrompt { by_player } => {
                view.set_phase(GamePhase::Swap);
                view.set_current_turn(Some(by_player));
                view.set_my_turn(view.identity().player_number == Some(by_player));
                view.clear_swap();
                Vec::new()
            }
            ServerMessage::SwapSuggested {
                slot_a,
                slot_b,
                by_player,
            } => {
                if view.phase() == GamePhase::Swap {
                    view.set_swap_pending(slot_a, slot_b, by_player);
                } else {
                    tracing::debug!(phase = %view.phase(), "Ignoring swap suggestion");
                }
                Vec::new()
            }
            ServerMessage::SwapResult {
                accepted,
                slot_a,
                slot_b,
                by_player,
            } => {
                if accepted {
                    Self::apply_accepted_swap(view, slot_a.zip(slot_b), by_player);
                }
                view.clear_swap();
                Vec::new()
            }
            ServerMessage::RevealCard {
                slot_index,
                card,
                delay,
            } => {
                if view.phase() != GamePhase::Reveal {
                    view.begin_reveal();
                }
                view.expect_reveal_card();
                vec![Effect::Schedule {
                    delay: Duration::from_millis(delay),
                    follow_up: FollowUp::RevealCard {
                        slot: slot_index,
                        card,
                    },
                }]
            }
            ServerMessage::GameResult { win, board } => {
                view.set_game_won(win);
                view.set_final_board(board);
                vec![Effect::Schedule {
                    delay: self.reveal_duration(view.reveal().total_reveal_cards),
                    follow_up: FollowUp::EnterGameOver,
                }]
            }
            ServerMessage::PlayAgainWaiting { player_name } => {
                if player_name != view.identity().player_name {
                    view.set_partner_wants_rematch(true);
                }
                Vec::new()
            }
        }
    }

    fn join_settled(view: &mut GameViewState) {
        if view.awaiting_join() {
            view.set_awaiting_join(false);
            view.set_join_error(None);
            view.set_partner_disconnected(false);
        }
    }

    fn turn_order_prompt(
        &self,
        view: &mut GameViewState,
        hand: Option<Vec<Card>>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if view.phase() == GamePhase::GameOver {
            tracing::info!("Rematch starting");
            view.reset_for_rematch();
            effects.push(Effect::CancelTimers);
        }
        if let Some(hand) = hand {
            view.set_hand(hand);
        }
        view.set_my_pick(None);
        view.set_turn_order_result(None);
        view.set_phase(GamePhase::TurnOrderPick);
        effects
    }

    fn apply_accepted_swap(
        view: &mut GameViewState,
        announced: Option<(usize, usize)>,
        by_player: Option<PlayerNumber>,
    ) {
        let pending = *view.swap();
        let Some((slot_a, slot_b)) = announced.or(pending.slots) else {
            tracing::warn!("Accepted swap without slots");
            return;
        };
        if view.swap_board_slots(slot_a, slot_b) {
            view.record_swap(SwapRecord {
                slot_a,
                slot_b,
                by_player: by_player.or(pending.suggester),
            });
        } else {
            tracing::warn!(slot_a, slot_b, "Accepted swap outside the board");
        }
    }

    fn reveal_duration(&self, cards: usize) -> Duration {
        let cards = u32::try_from(cards).unwrap_or(u32::MAX);
        self.settings.timing.reveal_pacing.saturating_mul(cards)
    }

    // =========================================================================
    // Follow-ups
    // =========================================================================

    pub fn apply_follow_up(&self, view: &mut GameViewState, follow_up: FollowUp) -> Vec<Effect> {
        match follow_up {
            FollowUp::HidePeek { slot, generation } => {
                match view.hide_disclosure(generation) {
                    Some(shown_at) if shown_at != slot => {
                        tracing::debug!(slot, shown_at, "Hid peek moved by a swap");
                    }
                    Some(_) => {}
                    None => tracing::debug!(slot, generation, "Peek already superseded"),
                }
            }
            FollowUp::RevealCard { slot, card } => {
                if view.disclose(slot, card).is_some() {
                    view.count_revealed_card();
                }
            }
            FollowUp::EnterGameOver => {
                let final_board: Vec<BoardCard> = view.final_board().to_vec();
                for entry in final_board {
                    let shown = view.board().get(entry.slot_index).and_then(|slot| slot.card);
                    if shown != Some(entry.card) {
                        view.disclose(entry.slot_index, entry.card);
                    }
                }
                view.set_phase(GamePhase::GameOver);
                tracing::info!(win = ?view.game_won(), "Game over");
            }
        }
        Vec::new()
    }

    // =========================================================================
    // User intents
    // =========================================================================

    pub fn apply_intent(&self, view: &mut GameViewState, intent: UserIntent) -> Vec<Effect> {
        match intent {
            UserIntent::CreateRoom { name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Vec::new();
                }
                view.set_player_name(name);
                view.set_awaiting_join(true);
                view.set_join_error(None);
                vec![self.connect_and_send(ClientMessage::CreateRoom {
                    name: name.to_string(),
                })]
            }
            UserIntent::JoinRoom { name, room_code } => {
                let name = name.trim();
                if name.is_empty() {
                    return Vec::new();
                }
                let room_code = room_code.trim().to_uppercase();
                view.set_player_name(name);
                view.set_room_code(room_code.clone());
                view.set_awaiting_join(true);
                view.set_join_error(None);
                vec![self.connect_and_send(ClientMessage::JoinRoom {
                    name: name.to_string(),
                    room_code,
                })]
            }
            UserIntent::PickTurnOrder(preference) => self.pick_turn_order(view, preference),
            UserIntent::SelectCard(index) => {
                if !view.is_hand_card_available(index) {
                    return Vec::new();
                }
                if view.selected_card() == Some(index) {
                    view.set_selected_card(None);
                } else {
                    view.set_selected_card(Some(index));
                }
                Vec::new()
            }
            UserIntent::PlaceCard { slot } => Self::place_selected(view, slot),
            UserIntent::ClickBoardSlot(slot) => {
                let Some(target) = view.board().get(slot).copied() else {
                    return Vec::new();
                };
                if view.selected_card().is_some() {
                    if target.occupied {
                        return Vec::new();
                    }
                    return Self::place_selected(view, slot);
                }
                let mine = view.identity().player_number;
                if target.occupied && mine.is_some() && target.by_player == mine {
                    return vec![Effect::Send(ClientMessage::Peek { slot_index: slot })];
                }
                Vec::new()
            }
            UserIntent::Pass => vec![Effect::Send(ClientMessage::Pass)],
            UserIntent::Peek(slot) => vec![Effect::Send(ClientMessage::Peek { slot_index: slot })],
            UserIntent::ClickSwapSlot(slot) => self.click_swap_slot(view, slot),
            UserIntent::SkipSwap => {
                if view.phase() != GamePhase::Swap {
                    return Vec::new();
                }
                view.set_armed_swap_slot(None);
                vec![Effect::Send(ClientMessage::SkipSwap)]
            }
            UserIntent::RespondSwap { accept } => {
                if view.phase() != GamePhase::Swap {
                    return Vec::new();
                }
                vec![Effect::Send(ClientMessage::RespondSwap { accept })]
            }
            UserIntent::PlayAgain => {
                view.set_rematch_requested(true);
                vec![Effect::Send(ClientMessage::PlayAgain)]
            }
            UserIntent::Leave => {
                tracing::info!(room = %view.identity().room_code, "Leaving game");
                view.reset();
                vec![Effect::CancelTimers, Effect::Disconnect, Effect::ReturnToLobby]
            }
        }
    }

    fn connect_and_send(&self, message: ClientMessage) -> Effect {
        Effect::ConnectAndSend {
            path: self.settings.ws_path.clone(),
            message,
        }
    }

    fn pick_turn_order(
        &self,
        view: &mut GameViewState,
        preference: TurnOrderPreference,
    ) -> Vec<Effect> {
        if view.phase() != GamePhase::TurnOrderPick || view.my_pick().is_some() {
            return Vec::new();
        }
        view.set_my_pick(Some(preference));
        vec![Effect::Send(ClientMessage::TurnOrderPick { preference })]
    }

    fn place_selected(view: &mut GameViewState, slot: usize) -> Vec<Effect> {
        let Some(card_index) = view.selected_card() else {
            return Vec::new();
        };
        view.mark_hand_used(card_index);
        view.set_selected_card(None);
        vec![Effect::Send(ClientMessage::PlaceCard {
            card_index,
            slot_index: slot,
        })]
    }

    fn click_swap_slot(&self, view: &mut GameViewState, slot: usize) -> Vec<Effect> {
        if view.phase() != GamePhase::Swap {
            return Vec::new();
        }
        match view.armed_swap_slot() {
            None => {
                view.set_armed_swap_slot(Some(slot));
                Vec::new()
            }
            Some(armed) if armed == slot => {
                view.set_armed_swap_slot(None);
                Vec::new()
            }
            Some(armed) if self.settings.swap_rule.allows(armed, slot) => {
                view.set_armed_swap_slot(None);
                vec![Effect::Send(ClientMessage::SuggestSwap {
                    slot_a: armed,
                    slot_b: slot,
                })]
            }
            Some(_) => {
                view.set_armed_swap_slot(Some(slot));
                Vec::new()
            }
        }
    }
}
