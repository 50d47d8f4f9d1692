//! Synchronization channel.
//!
//! Attaches a player to a room's update stream and turns every
//! authoritative snapshot into a full local [`RoomView`]. Views are
//! rebuilt from scratch each time, so duplicated or skipped
//! notifications do no harm. Each view carries the commit sequence it
//! was built from, which only ever grows. Each client derives the end of the game
//! from the same snapshot on its own.

use crate::games::reversi::{Color, Outcome, rules};
use crate::room::{Room, RoomDocument, RoomError, RoomId, RoomStatus};
use crate::store::{RoomSnapshot, SharedStore, StoreError};
use derive_getters::Getters;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// A client's local picture of a room.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RoomView {
    /// Commit sequence of the snapshot this view was built from.
    seq: u64,
    /// Decoded room.
    room: Room,
    /// Whether the board is in a terminal position.
    terminal: bool,
    /// Result derived from the board, once terminal.
    outcome: Option<Outcome>,
}

impl RoomView {
    /// Derives a view from a stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidDocument`] if the board does not reshape.
    pub fn from_document(room_id: RoomId, doc: &RoomDocument) -> Result<Self, RoomError> {
        Self::build(room_id, 0, doc)
    }

    /// Derives a view from a pushed snapshot, keeping its sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidDocument`] if the board does not reshape.
    pub fn from_snapshot(room_id: RoomId, snapshot: &RoomSnapshot) -> Result<Self, RoomError> {
        Self::build(room_id, snapshot.seq, &snapshot.document)
    }

    fn build(room_id: RoomId, seq: u64, doc: &RoomDocument) -> Result<Self, RoomError> {
        let room = Room::from_document(room_id, doc)?;
        let terminal = rules::is_terminal(room.board());
        let outcome = rules::winner(room.board());
        Ok(Self {
            seq,
            room,
            terminal,
            outcome,
        })
    }

    /// Returns true once the room is over, either by status or by board.
    pub fn is_over(&self) -> bool {
        *self.room.status() == RoomStatus::End || self.terminal
    }

    /// Returns true when the room is in play and `color` is to move.
    pub fn is_turn_of(&self, color: Color) -> bool {
        !self.is_over()
            && *self.room.status() == RoomStatus::Playing
            && *self.room.turn() == color
    }

    /// Returns true when the room is in play but neither color has a
    /// legal placement left.
    pub fn is_stalled(&self) -> bool {
        let board = self.room.board();
        !self.is_over()
            && *self.room.status() == RoomStatus::Playing
            && !rules::has_legal_move(board, Color::White)
            && !rules::has_legal_move(board, Color::Black)
    }
}

/// Subscribes players to room updates.
#[derive(Debug, Clone)]
pub struct SyncChannel {
    store: SharedStore,
}

impl SyncChannel {
    /// Creates a channel over the given store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Calls `on_update` with every snapshot of the room, starting with
    /// the current one, until the returned handle is dropped.
    ///
    /// Snapshots that fail to decode are skipped; the previous view
    /// stays in effect.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the room cannot be subscribed to.
    #[instrument(skip(self, on_update), fields(room_id = %room_id))]
    pub async fn subscribe<F>(
        &self,
        room_id: RoomId,
        mut on_update: F,
    ) -> Result<SyncHandle, StoreError>
    where
        F: FnMut(RoomView) + Send + 'static,
    {
        let mut subscription = self.store.subscribe(&room_id).await?;
        let span = info_span!("room_sync", room_id = %room_id);
        let task_room = room_id.clone();

        let task = tokio::spawn(
            async move {
                while let Some(snapshot) = subscription.next().await {
                    match RoomView::from_snapshot(task_room.clone(), &snapshot) {
                        Ok(view) => {
                            debug!(
                                seq = snapshot.seq,
                                status = %view.room().status(),
                                turn = %view.room().turn(),
                                "Snapshot received"
                            );
                            if let Some(outcome) = view.outcome() {
                                info!(%outcome, "Terminal board observed");
                            }
                            on_update(view);
                        }
                        Err(e) => warn!(error = %e, "Skipping undecodable snapshot"),
                    }
                }
                debug!("Update stream ended");
            }
            .instrument(span),
        );

        Ok(SyncHandle { room_id, task })
    }
}

/// Live subscription. Dropping it detaches without touching the room.
#[derive(Debug)]
pub struct SyncHandle {
    room_id: RoomId,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// The room being followed.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Detaches from the room.
    pub fn close(self) {
        debug!(room_id = %self.room_id, "Closing sync channel");
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
