//! WebSocket message types for server-client communication
//!
//! Every frame is a JSON object with a mandatory `type` tag (snake_case) and a
//! fixed, camelCase payload per tag. Both enums are closed: a tag that is not
//! listed here fails to decode rather than being silently accepted, and every
//! consumer matches them exhaustively.

use serde::{Deserialize, Serialize};

use tableau_domain::{deserialize_optional_player, Card, PlayerNumber, TurnOrderPreference};

/// Payload of the liveness probe
pub const HEARTBEAT_PAYLOAD: &str = "ping";

/// A card at a known board position, as listed in `game_result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCard {
    pub slot_index: usize,
    pub card: Card,
}

// =============================================================================
// Client Messages (Client → Server)
// =============================================================================

/// Messages from the client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Open a new room and take seat 1
    CreateRoom { name: String },
    /// Join an existing room by its code
    JoinRoom { name: String, room_code: String },
    /// Preference for who places first
    TurnOrderPick { preference: TurnOrderPreference },
    /// Place a card from the hand onto an empty board slot
    PlaceCard { card_index: usize, slot_index: usize },
    /// Use the single pass
    Pass,
    /// Privately look at one of our own board cards
    Peek { slot_index: usize },
    /// Propose exchanging two board slots
    SuggestSwap { slot_a: usize, slot_b: usize },
    /// Give up the current swap opportunity
    SkipSwap,
    /// Answer the partner's swap proposal
    RespondSwap { accept: bool },
    /// Ask for a rematch after the game is over
    PlayAgain,
    /// Liveness probe
    Echo { payload: String },
}

impl ClientMessage {
    /// The liveness probe sent while connected
    pub fn heartbeat() -> Self {
        ClientMessage::Echo {
            payload: HEARTBEAT_PAYLOAD.to_string(),
        }
    }

    /// Wire tag, for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            ClientMessage::CreateRoom { .. } => "create_room",
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::TurnOrderPick { .. } => "turn_order_pick",
            ClientMessage::PlaceCard { .. } => "place_card",
            ClientMessage::Pass => "pass",
            ClientMessage::Peek { .. } => "peek",
            ClientMessage::SuggestSwap { .. } => "suggest_swap",
            ClientMessage::SkipSwap => "skip_swap",
            ClientMessage::RespondSwap { .. } => "respond_swap",
            ClientMessage::PlayAgain => "play_again",
            ClientMessage::Echo { .. } => "echo",
        }
    }
}

// =============================================================================
// Server Messages (Server → Client)
// =============================================================================

/// Messages from the server to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Reply to a liveness probe
    Echo { payload: String },
    /// Request rejected by the server
    Error { message: String },
    /// Room opened; the creator holds `player_number`
    RoomCreated {
        room_code: String,
        player_number: PlayerNumber,
    },
    /// Seat assignment after a join; sent to both players
    PlayerJoined {
        player_name: String,
        player_number: PlayerNumber,
        partner_name: String,
    },
    /// A player's connection went away
    PlayerDisconnected { player_name: String },
    /// Ask for a turn-order preference; rematch prompts deal a fresh hand
    TurnOrderPrompt {
        #[serde(default)]
        hand: Option<Vec<Card>>,
    },
    /// Both picks are in
    TurnOrderResult {
        pick1: TurnOrderPreference,
        pick2: TurnOrderPreference,
        conflict: bool,
        #[serde(default, deserialize_with = "deserialize_optional_player")]
        first_player: Option<PlayerNumber>,
    },
    /// Placement begins
    GameStart {
        hand: Vec<Card>,
        first_player: PlayerNumber,
    },
    /// The receiving player may act
    YourTurn,
    /// A face-down card landed on the board
    CardPlaced {
        slot_index: usize,
        by_player: PlayerNumber,
    },
    /// A player used their pass
    PlayerPassed { by_player: PlayerNumber },
    /// Private disclosure of one of our own board cards
    PeekResult { slot_index: usize, card: Card },
    /// The named player may propose a swap
    SwapPrompt { by_player: PlayerNumber },
    /// A swap proposal awaits an answer
    SwapSuggested {
        slot_a: usize,
        slot_b: usize,
        by_player: PlayerNumber,
    },
    /// Outcome of a swap proposal
    SwapResult {
        accepted: bool,
        #[serde(default)]
        slot_a: Option<usize>,
        #[serde(default)]
        slot_b: Option<usize>,
        #[serde(default, deserialize_with = "deserialize_optional_player")]
        by_player: Option<PlayerNumber>,
    },
    /// One card of the end-of-game reveal, shown after `delay` milliseconds
    RevealCard {
        slot_index: usize,
        card: Card,
        delay: u64,
    },
    /// Final outcome, with the full board
    GameResult {
        win: bool,
        #[serde(default)]
        board: Vec<BoardCard>,
    },
    /// A player asked for a rematch and is waiting for the other
    PlayAgainWaiting { player_name: String },
}

impl ServerMessage {
    /// Wire tag, for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            ServerMessage::Echo { .. } => "echo",
            ServerMessage::Error { .. } => "error",
            ServerMessage::RoomCreated { .. } => "room_created",
            ServerMessage::PlayerJoined { .. } => "player_joined",
            ServerMessage::PlayerDisconnected { .. } => "player_disconnected",
            ServerMessage::TurnOrderPrompt { .. } => "turn_order_prompt",
            ServerMessage::TurnOrderResult { .. } => "turn_order_result",
            ServerMessage::GameStart { .. } => "game_start",
            ServerMessage::YourTurn => "your_turn",
            ServerMessage::CardPlaced { .. } => "card_placed",
            ServerMessage::PlayerPassed { .. } => "player_passed",
            ServerMessage::PeekResult { .. } => "peek_result",
            ServerMessage::SwapPrompt { .. } => "swap_prompt",
            ServerMessage::SwapSuggested { .. } => "swap_suggested",
            ServerMessage::SwapResult { .. } => "swap_result",
            ServerMessage::RevealCard { .. } => "reveal_card",
            ServerMessage::GameResult { .. } => "game_result",
            ServerMessage::PlayAgainWaiting { .. } => "play_again_waiting",
        }
    }
}
