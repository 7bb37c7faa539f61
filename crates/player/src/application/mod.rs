//! Game Phase Reducer and the session that drives it

pub mod effects;
pub mod intents;
pub mod reducer;
pub mod services;
pub mod settings;

pub use effects::{Effect, FollowUp};
pub use intents::UserIntent;
pub use reducer::GamePhaseReducer;
pub use services::GameSession;
pub use settings::{ReducerSettings, ReducerTiming, SwapProposalRule};
