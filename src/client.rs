//! A player's connection to a match.
//!
//! [`GameClient`] ties matchmaking, the sync channel and room
//! transitions together. Moves are computed against the last snapshot
//! received and then written; the local view only ever changes when
//! the store pushes a new snapshot back. Whose turn it is is checked
//! here, at the application level, not by the store.

use crate::games::reversi::{Color, Move, Outcome, Position, RejectReason};
use crate::matchmaking::MatchmakingService;
use crate::room::{RoomId, Transition};
use crate::session::{PlayerSession, SessionError};
use crate::store::SharedStore;
use crate::sync::{RoomView, SyncChannel, SyncHandle};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Result of a placement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceResult {
    /// The move was written to the store.
    Placed {
        /// Discs flipped by the move.
        flipped: Vec<Position>,
        /// Set when the move ended the game.
        outcome: Option<Outcome>,
    },
    /// The engine refused the move; nothing was written.
    Rejected(RejectReason),
}

/// One player's live session.
#[derive(Debug)]
pub struct GameClient {
    store: SharedStore,
    session: PlayerSession,
    views: watch::Receiver<Option<RoomView>>,
    sync: SyncHandle,
}

impl GameClient {
    /// Finds or opens a room and attaches to its updates.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if matchmaking or subscribing fails.
    #[instrument(skip(store), fields(collection = %store.collection()))]
    pub async fn connect(store: SharedStore) -> Result<Self, SessionError> {
        let session = MatchmakingService::new(store.clone())
            .find_or_create_room()
            .await?;
        Self::attach(store, session).await
    }

    /// Attaches an existing session to its room's updates.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the room cannot be subscribed to.
    #[instrument(skip(store), fields(room_id = %session.room_id(), color = %session.color()))]
    pub async fn attach(store: SharedStore, session: PlayerSession) -> Result<Self, SessionError> {
        let (tx, views) = watch::channel(None);
        let sync = SyncChannel::new(store.clone())
            .subscribe(session.room_id().clone(), move |view| {
                tx.send_replace(Some(view));
            })
            .await?;

        info!("Player attached to room");
        Ok(Self {
            store,
            session,
            views,
            sync,
        })
    }

    /// The player's session.
    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    /// The player's seat color.
    pub fn color(&self) -> Color {
        *self.session.color()
    }

    /// The room this client is bound to.
    pub fn room_id(&self) -> &RoomId {
        self.session.room_id()
    }

    /// The latest synchronized view, if any has arrived.
    pub fn view(&self) -> Option<RoomView> {
        self.views.borrow().clone()
    }

    /// Returns true when the room is in play and this player is to move.
    pub fn is_my_turn(&self) -> bool {
        self.views
            .borrow()
            .as_ref()
            .is_some_and(|view| view.is_turn_of(self.color()))
    }

    /// Waits until a synchronized view satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Disconnected`] if the update stream ends.
    pub async fn wait_until<P>(&self, mut predicate: P) -> Result<RoomView, SessionError>
    where
        P: FnMut(&RoomView) -> bool,
    {
        let mut views = self.views.clone();
        let view = views
            .wait_for(|view| view.as_ref().is_some_and(&mut predicate))
            .await
            .map_err(|_| SessionError::Disconnected(self.room_id().clone()))?;
        view.clone()
            .ok_or_else(|| SessionError::NotSynced(self.room_id().clone()))
    }

    /// Places a disc at `position`.
    ///
    /// An illegal placement is reported as [`PlaceResult::Rejected`]
    /// and writes nothing.
    ///
    /// # Errors
    ///
    /// [`SessionError::Room`] when the room is not in play or it is not
    /// this player's turn; [`SessionError::Store`] when the write fails.
    #[instrument(skip(self), fields(room_id = %self.room_id(), color = %self.color()))]
    pub async fn place(&self, position: Position) -> Result<PlaceResult, SessionError> {
        let view = self
            .view()
            .ok_or_else(|| SessionError::NotSynced(self.room_id().clone()))?;

        match view.room().play(Move::new(self.color(), position))? {
            Transition::Rejected(reason) => {
                debug!(%reason, "Placement rejected, nothing written");
                Ok(PlaceResult::Rejected(reason))
            }
            Transition::Commit {
                patch,
                flipped,
                outcome,
            } => {
                self.store
                    .update(self.room_id(), &patch)
                    .await
                    .inspect_err(|e| warn!(error = %e, "Move not applied"))?;
                info!(%position, flipped = flipped.len(), "Move committed");
                Ok(PlaceResult::Placed { flipped, outcome })
            }
        }
    }

    /// Hands the turn to the opponent.
    ///
    /// # Errors
    ///
    /// [`SessionError::Room`] when it is not this player's turn;
    /// [`SessionError::Store`] when the write fails.
    #[instrument(skip(self), fields(room_id = %self.room_id(), color = %self.color()))]
    pub async fn pass(&self) -> Result<(), SessionError> {
        let view = self
            .view()
            .ok_or_else(|| SessionError::NotSynced(self.room_id().clone()))?;
        let patch = view.room().pass(self.color())?;
        self.store
            .update(self.room_id(), &patch)
            .await
            .inspect_err(|e| warn!(error = %e, "Pass not applied"))?;
        info!("Turn passed");
        Ok(())
    }

    /// Leaves the room. The room itself is not modified.
    #[instrument(skip(self), fields(room_id = %self.room_id()))]
    pub fn close(self) {
        info!("Player detached");
        self.sync.close();
    }
}
