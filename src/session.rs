//! Player sessions.
//!
//! A session is client-local and never persisted: the seat color a
//! player was given and the room it is bound to. It is rebuilt each
//! time a player goes through matchmaking.

use crate::games::reversi::Color;
use crate::room::{RoomError, RoomId};
use crate::store::StoreError;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// One player's seat in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PlayerSession {
    /// Room the player is bound to.
    room_id: RoomId,
    /// Seat color.
    color: Color,
}

/// Error from a session operation.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum SessionError {
    /// The store failed; the action was not applied.
    #[display("Action not applied: {}", _0)]
    Store(StoreError),

    /// The room refused the action.
    #[display("{}", _0)]
    Room(RoomError),

    /// No snapshot of the room has arrived yet.
    #[display("Room {} has not synchronized yet", _0)]
    #[from(ignore)]
    NotSynced(RoomId),

    /// The room's update stream ended.
    #[display("Lost the update stream for room {}", _0)]
    #[from(ignore)]
    Disconnected(RoomId),
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Store(err) => Some(err),
            SessionError::Room(err) => Some(err),
            SessionError::NotSynced(_) | SessionError::Disconnected(_) => None,
        }
    }
}
