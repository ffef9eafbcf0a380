use std::path::PathBuf;
use std::sync::Arc;

use blokus::{
    validate_orientation_table, visualize_board, visualize_piece, Catalog, GameState, Outcome,
};
use blokus_client::{Session, SessionEvent};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::commands::{Command, HELP};
use crate::config::{ClientConfig, ColorArg, Settings};

mod commands;
mod config;

#[derive(Parser)]
struct Args {
    /// Websocket URL of the game server [default: ws://localhost:8887]
    #[arg(short, long)]
    server_url: Option<String>,

    /// The color to play with [default: orange]
    #[arg(short, long, value_enum)]
    color: Option<ColorArg>,

    /// Path to a JSON config file with defaults for the other options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a piece notation file replacing the standard pieces
    #[arg(long)]
    pieces: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    validate_orientation_table()?;

    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    let settings = Settings::resolve(args.server_url, args.color, args.pieces, config)?;
    debug!(num_pieces = settings.catalog.len(), "Loaded pieces");

    let (session, mut events) =
        Session::connect(settings.server_url.as_str(), Arc::new(settings.catalog)).await?;
    session.start(settings.color)?;
    println!("{}", HELP);

    let mut states = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Opened) => {}
                Some(SessionEvent::StateUpdated(state)) => {
                    if state.is_over() {
                        print_outcome(&state);
                    }
                }
                Some(SessionEvent::MoveRejected { piece_id }) => {
                    println!("The server did not accept the move with piece {}", piece_id);
                }
                Some(SessionEvent::Terminated { reason }) => {
                    warn!(?reason, "The server closed the connection");
                    break;
                }
                None => break,
            },
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                if let Some(state) = state {
                    print_state(session.catalog(), &state);
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Err(err) = execute(&session, command) {
                            println!("{}", err);
                        }
                    }
                    Err(err) => println!("{}", err),
                }
            },
        }
    }

    info!("Leaving the game");
    session.close().await;
    Ok(())
}

fn execute(session: &Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Select(piece_id) => {
            let state = session.state();
            if !state.is_some_and(|s| s.pieces_remaining.contains(piece_id)) {
                anyhow::bail!("Piece {} is not in your hand", piece_id);
            }
            session.select_piece(Some(piece_id))?;
        }
        Command::Deselect => session.select_piece(None)?,
        Command::Orient(change) => {
            let selected = session.state().and_then(|s| s.selected_piece);
            let Some(piece_id) = selected else {
                anyhow::bail!("Select a piece first");
            };
            session.change_orientation(piece_id, change)?;
        }
        Command::Place { row, col } => session.attempt_selected_move((row, col))?,
        Command::Pieces => {
            if let Some(state) = session.state() {
                print_hand(session.catalog(), &state);
            }
        }
        Command::Board => {
            if let Some(state) = session.state() {
                print_state(session.catalog(), &state);
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

fn print_state(catalog: &Catalog, state: &GameState) {
    println!("{}", visualize_board(&state.board));
    println!(
        "You play {} | {} to move | score {} : {}",
        state.color,
        state.turn,
        state.score_of(state.color),
        state.score_of(state.color.opponent()),
    );
    if let Some(piece) = state.selected_oriented_piece() {
        if let Some(shape) = catalog.get(piece.piece_id) {
            println!("Selected piece {} ({}):", piece.piece_id, piece.orientation);
            println!("{}", visualize_piece(shape, piece.orientation));
        }
    }
}

fn print_hand(catalog: &Catalog, state: &GameState) {
    for piece in &state.pieces_remaining {
        let Some(shape) = catalog.get(piece.piece_id) else {
            continue;
        };
        println!("Piece {} ({} cells):", piece.piece_id, shape.num_cells());
        println!("{}", visualize_piece(shape, piece.orientation));
    }
    println!(
        "{} of {} pieces left",
        state.pieces_remaining.len(),
        catalog.len()
    );
}

fn print_outcome(state: &GameState) {
    match state.outcome() {
        Outcome::InProgress => {}
        Outcome::Won => println!("You won!"),
        Outcome::Lost => println!("You lost."),
        Outcome::Tie => println!("It's a tie."),
    }
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
