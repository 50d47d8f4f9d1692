//! Reversi Online library - two-player online Reversi
//!
//! Two remote players are paired into a room and play Reversi while
//! both observe the same continuously synchronized board.
//!
//! # Architecture
//!
//! - **Board engine**: pure legal-move, flip and end-of-game rules
//! - **Rooms**: the stored document and the `matching -> playing -> end` lifecycle
//! - **Store**: shared-state store contract with in-memory and SQLite backends
//! - **Matchmaking**: find a waiting room or open one
//! - **Sync**: push every committed room snapshot to each player
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use reversi_online::{GameClient, MemoryStore, Position, SharedStore};
//!
//! # async fn example() -> Result<(), reversi_online::SessionError> {
//! let store: SharedStore = Arc::new(MemoryStore::default());
//! let white = GameClient::connect(store.clone()).await?;
//! let black = GameClient::connect(store).await?;
//!
//! white.wait_until(|view| view.is_turn_of(white.color())).await?;
//! white.place(Position::new(2, 4).unwrap()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod games;
mod matchmaking;
mod players;
mod room;
mod session;
mod store;
mod sync;

// Crate-level exports - Board engine
pub use games::reversi::{
    BOARD_SIZE, Board, BoardError, Cell, Color, Move, MoveOutcome, NUM_CELLS, Outcome, Position,
    RejectReason, apply_move, has_legal_move, is_terminal, legal_flips, legal_moves, winner,
};

// Crate-level exports - Rooms
pub use room::{
    Room, RoomDocument, RoomError, RoomFilter, RoomId, RoomPatch, RoomStatus, Transition,
};

// Crate-level exports - Store
pub use store::{
    ChangeNotifier, DEFAULT_COLLECTION, MemoryStore, RoomSnapshot, RoomStore, RoomSubscription,
    SharedStore, SqliteStore, StoreError, StoreErrorKind,
};

// Crate-level exports - Sessions, matchmaking and sync
pub use client::{GameClient, PlaceResult};
pub use matchmaking::MatchmakingService;
pub use session::{PlayerSession, SessionError};
pub use sync::{RoomView, SyncChannel, SyncHandle};

// Crate-level exports - Automated players
pub use players::{FirstLegalMove, MatchBudget, MoveSelector, play_out};

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, StoreConfig};
