//! Command-line interface for reversi_online.

use clap::{Parser, Subcommand};
use reversi_online::RoomStatus;
use std::path::PathBuf;

/// Reversi Online - matchmaking, rooms and synchronized play
#[derive(Parser, Debug)]
#[command(name = "reversi_online")]
#[command(about = "Two-player online Reversi over a shared room store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match two automated players and play a full game
    Demo {
        /// Use a SQLite store at this path instead of the configured one
        #[arg(long)]
        db_path: Option<String>,

        /// Maximum moves and passes, both players together
        #[arg(long, default_value = "200")]
        max_turns: usize,
    },

    /// List rooms in the store
    Rooms {
        /// Use a SQLite store at this path instead of the configured one
        #[arg(long)]
        db_path: Option<String>,

        /// Only show rooms in this status (matching, playing, end)
        #[arg(long)]
        status: Option<RoomStatus>,
    },
}
