//! Side effects requested by the reducer
//!
//! The reducer never touches the network or the clock. It returns these, and
//! the session task carries them out in order.

use std::time::Duration;

use tableau_domain::Card;
use tableau_shared::ClientMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write a message on the open connection
    Send(ClientMessage),
    /// Open the connection at `path`, then send once it is connected
    ConnectAndSend { path: String, message: ClientMessage },
    /// Close the connection on purpose
    Disconnect,
    /// Feed `follow_up` back into the reducer after `delay`
    Schedule { delay: Duration, follow_up: FollowUp },
    /// Drop every scheduled follow-up that has not fired yet
    CancelTimers,
    /// Hand control back to the lobby screen
    ReturnToLobby,
}

/// Delayed update scheduled by an earlier fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// End a peek, unless the slot was disclosed again since
    HidePeek { slot: usize, generation: u64 },
    /// Show one card of the final reveal
    RevealCard { slot: usize, card: Card },
    /// The reveal has played out; show the result
    EnterGameOver,
}
