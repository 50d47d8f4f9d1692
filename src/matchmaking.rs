//! Matchmaking: find a room waiting for a player, or open one.
//!
//! Matching is best-effort. Two players searching at the same time may
//! both join the same room (both incrementing from the same count) or
//! both open separate rooms. Nothing here serializes that.

use crate::games::reversi::Color;
use crate::room::{Room, RoomDocument, RoomFilter, RoomStatus};
use crate::session::{PlayerSession, SessionError};
use crate::store::SharedStore;
use tracing::{debug, info, instrument, warn};

/// Pairs players into rooms.
#[derive(Debug, Clone)]
pub struct MatchmakingService {
    store: SharedStore,
}

impl MatchmakingService {
    /// Creates a matchmaking service over the given store.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Joins the first matching room, or creates one.
    ///
    /// Matching rooms whose stored board does not decode are skipped.
    ///
    /// A created room starts with one participant and the creator plays
    /// white. Joining a room that thereby reaches two participants
    /// starts play and seats the joiner as black.
    ///
    /// # Errors
    ///
    /// Propagates store failures; nothing is retried.
    #[instrument(skip(self), fields(collection = %self.store.collection()))]
    pub async fn find_or_create_room(&self) -> Result<PlayerSession, SessionError> {
        let waiting = self
            .store
            .query(&RoomFilter::Status(RoomStatus::Matching))
            .await?;
        debug!(candidates = waiting.len(), "Queried matching rooms");

        let candidate = waiting.into_iter().find_map(|(room_id, doc)| {
            Room::from_document(room_id.clone(), &doc)
                .inspect_err(|e| warn!(room_id = %room_id, error = %e, "Skipping undecodable room"))
                .ok()
        });

        let Some(room) = candidate else {
            let room_id = self.store.create(RoomDocument::new_matching()).await?;
            info!(room_id = %room_id, color = %Color::White, "Opened new room");
            return Ok(PlayerSession::new(room_id, Color::White));
        };

        let room_id = room.id().clone();
        let (patch, color) = room.join()?;
        let committed = self.store.update(&room_id, &patch).await?;

        info!(
            room_id = %room_id,
            color = %color,
            num_people = committed.num_people,
            status = %committed.status,
            "Joined room"
        );
        Ok(PlayerSession::new(room_id, color))
    }
}
