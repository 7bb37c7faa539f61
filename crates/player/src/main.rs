//! Tableau Player - console driver for the client session engine.
//!
//! Reads one command per line from stdin and logs every new view snapshot.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tableau_domain::TurnOrderPreference;
use tableau_player::ports::outbound::Navigator;
use tableau_player::{
    ClientConfig, GamePhaseReducer, GameSession, GameViewState, TransportManager, UserIntent,
};

const HELP: &str = "commands: create NAME | join NAME CODE | pick first|neutral|no_first | \
select I | slot S | pass | peek S | swap S | skip | accept | reject | again | leave | quit";

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn return_to_lobby(&self) {
        tracing::info!("Back in the lobby; create or join a room");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tableau_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tableau Player");

    let config = ClientConfig::from_env().context("loading configuration")?;
    tracing::info!(
        origin = %config.origin,
        path = %config.reducer.ws_path,
        swap_rule = %config.reducer.swap_rule,
        "Configuration loaded"
    );

    let transport = TransportManager::new(config.origin.clone(), config.transport.clone());
    let session = GameSession::spawn(
        Arc::new(transport.clone()),
        Arc::new(ConsoleNavigator),
        GamePhaseReducer::new(config.reducer.clone()),
    );

    let mut view = session.view();
    tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let snapshot = view.borrow_and_update().clone();
            log_snapshot(&snapshot);
        }
    });

    let mut connection = transport.observe();
    tokio::spawn(async move {
        while let Some(state) = connection.changed().await {
            tracing::info!(%state, "Connection");
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        match parse_command(line) {
            Some(intent) => session.dispatch(intent),
            None => println!("{HELP}"),
        }
    }

    transport.disconnect();
    session.shutdown().await;
    tracing::info!("Bye");
    Ok(())
}

fn parse_command(line: &str) -> Option<UserIntent> {
    let mut words = line.split_whitespace();
    let command = words.next()?;

    let intent = match command {
        "create" => UserIntent::CreateRoom {
            name: line["create".len()..].trim().to_string(),
        },
        "join" => {
            let name = words.next()?.to_string();
            let room_code = words.next()?.to_string();
            UserIntent::JoinRoom { name, room_code }
        }
        "pick" => UserIntent::PickTurnOrder(words.next()?.parse::<TurnOrderPreference>().ok()?),
        "select" => UserIntent::SelectCard(index(words.next())?),
        "slot" => UserIntent::ClickBoardSlot(index(words.next())?),
        "pass" => UserIntent::Pass,
        "peek" => UserIntent::Peek(index(words.next())?),
        "swap" => UserIntent::ClickSwapSlot(index(words.next())?),
        "skip" => UserIntent::SkipSwap,
        "accept" => UserIntent::RespondSwap { accept: true },
        "reject" => UserIntent::RespondSwap { accept: false },
        "again" => UserIntent::PlayAgain,
        "leave" => UserIntent::Leave,
        _ => return None,
    };
    Some(intent)
}

fn index(word: Option<&str>) -> Option<usize> {
    word?.parse().ok()
}

fn log_snapshot(view: &GameViewState) {
    let board: String = view
        .board()
        .slots()
        .iter()
        .map(|slot| match (slot.card, slot.by_player) {
            (Some(card), _) => format!("[{:>3}]", card.to_string()),
            (None, Some(player)) => format!("[ P{player}]"),
            (None, None) => "[   ]".to_string(),
        })
        .collect();
    let hand: Vec<String> = view
        .hand()
        .iter()
        .zip(view.hand_used())
        .map(|(card, used)| if *used { "--".to_string() } else { card.to_string() })
        .collect();

    tracing::info!(
        phase = %view.phase(),
        room = %view.identity().room_code,
        my_turn = view.is_my_turn(),
        selected = ?view.selected_card(),
        swap = ?view.swap().slots,
        won = ?view.game_won(),
        "{board}"
    );
    tracing::debug!(hand = %hand.join(" "), join_error = ?view.join_error(), "Hand");
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
