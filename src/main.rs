//! Reversi Online - CLI entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use reversi_online::{
    AppConfig, Color, FirstLegalMove, GameClient, MatchBudget, RoomFilter, RoomStatus, RoomView,
    StoreConfig, play_out,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    match cli.command {
        Command::Demo { db_path, max_turns } => {
            if let Some(path) = db_path {
                config = config.with_store(StoreConfig::Sqlite { path });
            }
            run_demo(config, max_turns).await
        }
        Command::Rooms { db_path, status } => {
            if let Some(path) = db_path {
                config = config.with_store(StoreConfig::Sqlite { path });
            }
            list_rooms(config, status).await
        }
    }
}

/// Pairs two automated players and plays until the room ends.
#[instrument(skip(config), fields(store = ?config.store()))]
async fn run_demo(config: AppConfig, max_turns: usize) -> Result<()> {
    let store = config.open_store()?;

    let first = GameClient::connect(store.clone()).await?;
    let second = GameClient::connect(store.clone()).await?;
    if first.room_id() != second.room_id() {
        bail!(
            "players were not paired: {} is in {}, {} is in {} (a stale matching room?)",
            first.color(),
            first.room_id(),
            second.color(),
            second.room_id()
        );
    }
    info!(room_id = %first.room_id(), "Players paired");

    let selector = FirstLegalMove;
    let budget = MatchBudget::new(max_turns);
    let (first_view, second_view) = tokio::join!(
        play_out(&first, &selector, &budget),
        play_out(&second, &selector, &budget)
    );
    if budget.is_stopped() {
        warn!(max_turns, "Demo stopped before the room ended");
    }
    let view = first_view?;
    second_view?;

    print_result(&view);
    first.close();
    second.close();
    Ok(())
}

fn print_result(view: &RoomView) {
    let board = view.room().board();
    println!("{}\n", board.display());
    println!(
        "white {} / black {} / empty {}",
        board.count(Color::White),
        board.count(Color::Black),
        board.empty_count()
    );
    match view.outcome() {
        Some(outcome) => println!("Result: {}", outcome),
        None => println!("Result: unfinished ({})", view.room().status()),
    }
}

/// Prints the rooms in the configured store.
#[instrument(skip(config), fields(store = ?config.store()))]
async fn list_rooms(config: AppConfig, status: Option<RoomStatus>) -> Result<()> {
    let store = config.open_store()?;
    let filter = status.map_or(RoomFilter::All, RoomFilter::Status);
    let rooms = store.query(&filter).await?;

    if rooms.is_empty() {
        println!("No rooms in '{}'", store.collection());
        return Ok(());
    }

    println!("Rooms in '{}':\n", store.collection());
    for (id, doc) in rooms {
        println!(
            "{:>12}  {:<8}  players {}/2  turn {}",
            id, doc.status, doc.num_people, doc.turn
        );
    }
    Ok(())
}
