//! User intents accepted by the session engine

use tableau_domain::TurnOrderPreference;

/// Something the player asked for.
///
/// Inputs are primitive and already trimmed by the caller where it matters;
/// game legality is left to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    CreateRoom { name: String },
    JoinRoom { name: String, room_code: String },
    PickTurnOrder(TurnOrderPreference),
    /// Toggle selection of a hand card
    SelectCard(usize),
    /// Place the selected hand card on a slot
    PlaceCard { slot: usize },
    /// Click on a board slot outside the swap phase
    ClickBoardSlot(usize),
    Pass,
    Peek(usize),
    /// Click on a board slot during the swap phase
    ClickSwapSlot(usize),
    SkipSwap,
    RespondSwap { accept: bool },
    PlayAgain,
    Leave,
}
