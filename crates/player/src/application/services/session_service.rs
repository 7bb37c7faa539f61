//! Session service driving one player's game
//!
//! This service handles:
//! - Feeding inbound server messages, user intents and fired timers through the
//!   [`GamePhaseReducer`], strictly one at a time
//! - Publishing each new [`GameViewState`] snapshot to observers
//! - Carrying out the reducer's effects on the transport and navigator
//!
//! Every scheduled follow-up, and every "send once connected" wait, runs as a
//! task in one `JoinSet` owned by the session task. Cancelling timers aborts
//! the whole set, and dropping the session drops it.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use tableau_shared::ServerMessage;

use crate::application::effects::{Effect, FollowUp};
use crate::application::intents::UserIntent;
use crate::application::reducer::GamePhaseReducer;
use crate::ports::outbound::{GameTransport, Navigator};
use crate::state::GameViewState;

/// Handle to a running session task.
///
/// Dropping the handle stops the task and cancels everything it scheduled.
pub struct GameSession {
    intents: mpsc::UnboundedSender<UserIntent>,
    view: watch::Receiver<GameViewState>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl GameSession {
    /// Subscribe to the transport and start the session task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        transport: Arc<dyn GameTransport>,
        navigator: Arc<dyn Navigator>,
        reducer: GamePhaseReducer,
    ) -> Self {
        let inbound = transport.subscribe();
        let (intents, intent_rx) = mpsc::unbounded_channel();
        let (view_tx, view) = watch::channel(GameViewState::new());
        let shutdown = CancellationToken::new();

        let driver = SessionDriver {
            transport,
            navigator,
            reducer,
            view: view_tx,
            timers: JoinSet::new(),
        };
        let task = tokio::spawn(driver.run(inbound, intent_rx, shutdown.clone()));

        Self {
            intents,
            view,
            shutdown,
            task: Some(task),
        }
    }

    /// Queue a user intent; it is folded after everything already queued.
    pub fn dispatch(&self, intent: UserIntent) {
        if self.intents.send(intent).is_err() {
            tracing::warn!("Session task has stopped; intent dropped");
        }
    }

    /// Watch the view state.
    pub fn view(&self) -> watch::Receiver<GameViewState> {
        self.view.clone()
    }

    /// Copy of the current view state.
    pub fn snapshot(&self) -> GameViewState {
        self.view.borrow().clone()
    }

    /// Stop the session task and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Session task ended abnormally");
            }
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// The single writer of the view state.
struct SessionDriver {
    transport: Arc<dyn GameTransport>,
    navigator: Arc<dyn Navigator>,
    reducer: GamePhaseReducer,
    view: watch::Sender<GameViewState>,
    /// Scheduled follow-ups yield `Some`, connect-then-send waits yield `None`
    timers: JoinSet<Option<FollowUp>>,
}

impl SessionDriver {
    async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<ServerMessage>,
        mut intents: mpsc::UnboundedReceiver<UserIntent>,
        shutdown: CancellationToken,
    ) {
        tracing::debug!("Session task started");
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(message) = inbound.recv() => {
                    self.fold(|reducer, view| reducer.apply_server(view, message));
                }
                Some(intent) = intents.recv() => {
                    self.fold(|reducer, view| reducer.apply_intent(view, intent));
                }
                Some(done) = self.timers.join_next(), if !self.timers.is_empty() => {
                    self.timer_finished(done);
                }
                else => break,
            }
        }
        self.timers.abort_all();
        tracing::debug!("Session task stopped");
    }

    fn fold(&mut self, step: impl FnOnce(&GamePhaseReducer, &mut GameViewState) -> Vec<Effect>) {
        let reducer = &self.reducer;
        let mut effects = Vec::new();
        self.view.send_modify(|view| effects = step(reducer, view));
        for effect in effects {
            self.execute(effect);
        }
    }

    fn timer_finished(&mut self, done: Result<Option<FollowUp>, JoinError>) {
        match done {
            Ok(Some(follow_up)) => {
                self.fold(|reducer, view| reducer.apply_follow_up(view, follow_up));
            }
            Ok(None) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => tracing::error!(error = %e, "Timer task failed"),
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Send(message) => self.transport.send(message),
            Effect::ConnectAndSend { path, message } => {
                self.transport.connect(&path);
                let mut observer = self.transport.observe();
                let transport = Arc::clone(&self.transport);
                self.timers.spawn(async move {
                    if observer.wait_connected().await {
                        transport.send(message);
                    } else {
                        tracing::warn!(kind = message.type_name(), "Transport gone before open");
                    }
                    None
                });
            }
            Effect::Disconnect => self.transport.disconnect(),
            Effect::Schedule { delay, follow_up } => {
                self.timers.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Some(follow_up)
                });
            }
            Effect::CancelTimers => {
                if !self.timers.is_empty() {
                    tracing::debug!(pending = self.timers.len(), "Cancelling timers");
                }
                self.timers.abort_all();
            }
            Effect::ReturnToLobby => self.navigator.return_to_lobby(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use tableau_domain::{Card, GamePhase, PlayerNumber, Suit};
    use tableau_shared::ClientMessage;

    use crate::infrastructure::messaging::{connection_state_channel, ConnectionState};
    use crate::ports::outbound::{MockGameTransport, MockNavigator};

    struct Harness {
        session: GameSession,
        view: watch::Receiver<GameViewState>,
        inbound: mpsc::UnboundedSender<ServerMessage>,
        sent: mpsc::UnboundedReceiver<ClientMessage>,
        state: watch::Sender<ConnectionState>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Harness {
        fn start() -> Self {
            let (inbound, inbound_rx) = mpsc::unbounded_channel();
            let (sent_tx, sent) = mpsc::unbounded_channel();
            let (state, observer) = connection_state_channel();
            let calls = Arc::new(Mutex::new(Vec::new()));

            let mut transport = MockGameTransport::new();
            transport.expect_subscribe().return_once(move || inbound_rx);
            transport
                .expect_observe()
                .returning(move || observer.clone());
            transport.expect_send().returning(move |message| {
                let _ = sent_tx.send(message);
            });
            let log = Arc::clone(&calls);
            transport.expect_connect().returning(move |path: &str| {
                log.lock().expect("call log").push(format!("connect {path}"));
            });
            let log = Arc::clone(&calls);
            transport.expect_disconnect().returning(move || {
                log.lock().expect("call log").push("disconnect".into());
            });
            transport
                .expect_state()
                .return_const(ConnectionState::Disconnected);

            let mut navigator = MockNavigator::new();
            let log = Arc::clone(&calls);
            navigator.expect_return_to_lobby().returning(move || {
                log.lock().expect("call log").push("lobby".into());
            });

            let session = GameSession::spawn(
                Arc::new(transport),
                Arc::new(navigator),
                GamePhaseReducer::default(),
            );
            let view = session.view();
            Self {
                session,
                view,
                inbound,
                sent,
                state,
                calls,
            }
        }

        fn server(&self, message: ServerMessage) {
            self.inbound.send(message).expect("session listening");
        }

        async fn until(&mut self, check: impl FnMut(&GameViewState) -> bool) {
            self.view
                .wait_for(check)
                .await
                .map(|_| ())
                .expect("session task stopped");
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("call log").clone()
        }

        async fn in_placement(&mut self) {
            self.server(ServerMessage::RoomCreated {
                room_code: "QX7P".into(),
                player_number: PlayerNumber::One,
            });
            self.server(ServerMessage::GameStart {
                hand: (1..=7)
                    .map(|v| Card::new(Suit::Hearts, v).expect("valid card"))
                    .collect(),
                first_player: PlayerNumber::One,
            });
            self.until(|v| v.phase() == GamePhase::Placement).await;
        }
    }

    fn card() -> Card {
        Card::new(Suit::Spades, 6).expect("valid card")
    }

    #[tokio::test(start_paused = true)]
    async fn join_waits_for_open_connection() {
        let mut h = Harness::start();

        h.session.dispatch(UserIntent::CreateRoom {
            name: "Ada".into(),
        });
        h.until(|v| v.awaiting_join()).await;
        assert_eq!(h.calls(), vec!["connect /ws".to_string()]);

        tokio::task::yield_now().await;
        assert!(h.sent.try_recv().is_err(), "nothing sent before open");

        h.state.send_replace(ConnectionState::Connecting);
        h.state.send_replace(ConnectionState::Connected);
        assert_eq!(
            h.sent.recv().await,
            Some(ClientMessage::CreateRoom { name: "Ada".into() })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn place_card_is_sent_exactly_once() {
        let mut h = Harness::start();
        h.in_placement().await;

        h.session.dispatch(UserIntent::SelectCard(2));
        h.session.dispatch(UserIntent::PlaceCard { slot: 5 });
        h.until(|v| v.hand_used()[2]).await;

        assert_eq!(
            h.sent.try_recv().ok(),
            Some(ClientMessage::PlaceCard {
                card_index: 2,
                slot_index: 5,
            })
        );
        assert!(h.sent.try_recv().is_err());
        assert_eq!(h.session.snapshot().selected_card(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn peek_hides_after_two_seconds() {
        let mut h = Harness::start();
        h.in_placement().await;

        h.server(ServerMessage::PeekResult {
            slot_index: 4,
            card: card(),
        });
        h.until(|v| v.board().get(4).is_some_and(|s| s.card.is_some()))
            .await;

        tokio::time::sleep(Duration::from_millis(1_990)).await;
        assert!(h.session.snapshot().board().get(4).is_some_and(|s| s.card.is_some()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(h.session.snapshot().board().get(4).is_some_and(|s| s.card.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn game_over_follows_full_reveal() {
        let mut h = Harness::start();
        h.in_placement().await;

        h.server(ServerMessage::RevealCard {
            slot_index: 0,
            card: card(),
            delay: 0,
        });
        h.server(ServerMessage::RevealCard {
            slot_index: 1,
            card: card(),
            delay: 800,
        });
        h.server(ServerMessage::GameResult {
            win: true,
            board: vec![],
        });
        h.until(|v| v.game_won() == Some(true)).await;

        tokio::time::sleep(Duration::from_millis(1_590)).await;
        let during = h.session.snapshot();
        assert_eq!(during.phase(), GamePhase::Reveal);
        assert_eq!(during.reveal().revealed_count, 2);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.session.snapshot().phase(), GamePhase::GameOver);
    }

    #[tokio::test(start_paused = true)]
    async fn leave_cancels_pending_timers() {
        let mut h = Harness::start();
        h.in_placement().await;

        h.server(ServerMessage::RevealCard {
            slot_index: 3,
            card: card(),
            delay: 500,
        });
        h.until(|v| v.phase() == GamePhase::Reveal).await;

        h.session.dispatch(UserIntent::Leave);
        h.until(|v| v.phase() == GamePhase::Lobby).await;
        assert_eq!(
            h.calls(),
            vec!["disconnect".to_string(), "lobby".to_string()]
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
        let view = h.session.snapshot();
        assert!(view.board().is_empty());
        assert_eq!(view.reveal().revealed_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rematch_prompt_cancels_reveal_timers() {
        let mut h = Harness::start();
        h.in_placement().await;

        // This card's reveal is still pending when the game ends.
        h.server(ServerMessage::RevealCard {
            slot_index: 10,
            card: card(),
            delay: 5_000,
        });
        h.server(ServerMessage::GameResult {
            win: false,
            board: vec![],
        });
        h.until(|v| v.game_won() == Some(false)).await;
        tokio::time::sleep(Duration::from_millis(900)).await;
        h.until(|v| v.phase() == GamePhase::GameOver).await;

        h.server(ServerMessage::TurnOrderPrompt { hand: None });
        h.until(|v| v.phase() == GamePhase::TurnOrderPick).await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let view = h.session.snapshot();
        assert_eq!(view.phase(), GamePhase::TurnOrderPick);
        assert!(view.board().is_empty());
        assert_eq!(view.reveal().revealed_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_task() {
        let h = Harness::start();
        let Harness { session, inbound, .. } = h;
        session.shutdown().await;
        assert!(inbound.send(ServerMessage::YourTurn).is_err());
    }
}
