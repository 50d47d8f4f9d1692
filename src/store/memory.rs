//! In-memory store.

use super::{ChangeNotifier, RoomStore, RoomSubscription, StoreError};
use crate::room::{RoomDocument, RoomFilter, RoomId, RoomPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct Documents {
    next_seq: u64,
    rooms: HashMap<RoomId, (u64, RoomDocument)>,
}

/// Room store held in process memory.
///
/// Writes and their notifications happen under one lock, so commit
/// order and delivery order agree. `set_offline` makes every operation
/// fail as unavailable, for exercising failure paths.
#[derive(Debug)]
pub struct MemoryStore {
    collection: String,
    documents: Mutex<Documents>,
    notifier: ChangeNotifier,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store for the given collection.
    #[instrument(skip(collection), fields(collection = %collection.as_ref()))]
    pub fn new(collection: impl AsRef<str>) -> Self {
        info!("Creating in-memory room store");
        Self {
            collection: collection.as_ref().to_string(),
            documents: Mutex::new(Documents::default()),
            notifier: ChangeNotifier::new(),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulates the backend going away (or coming back).
    pub fn set_offline(&self, offline: bool) {
        warn!(offline, "Toggling store availability");
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!(
                "Store '{}' is offline",
                self.collection
            )));
        }
        self.documents
            .lock()
            .map_err(|_| StoreError::unavailable("Store lock poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(super::DEFAULT_COLLECTION)
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    #[instrument(skip(self, doc), fields(collection = %self.collection))]
    async fn create(&self, doc: RoomDocument) -> Result<RoomId, StoreError> {
        let mut documents = self.lock()?;
        documents.next_seq += 1;
        let seq = documents.next_seq;
        let id = RoomId::new(format!("room-{:06}", seq));
        documents.rooms.insert(id.clone(), (seq, doc));
        info!(room_id = %id, "Room created");
        Ok(id)
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn get(&self, id: &RoomId) -> Result<Option<RoomDocument>, StoreError> {
        let documents = self.lock()?;
        let doc = documents.rooms.get(id).map(|(_, doc)| doc.clone());
        if doc.is_none() {
            debug!(room_id = %id, "Room not found");
        }
        Ok(doc)
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    async fn query(&self, filter: &RoomFilter) -> Result<Vec<(RoomId, RoomDocument)>, StoreError> {
        let documents = self.lock()?;
        let mut found: Vec<_> = documents
            .rooms
            .iter()
            .filter(|(_, (_, doc))| filter.matches(doc))
            .map(|(id, (seq, doc))| (*seq, id.clone(), doc.clone()))
            .collect();
        found.sort_by_key(|(seq, _, _)| *seq);
        debug!(count = found.len(), "Query complete");
        Ok(found.into_iter().map(|(_, id, doc)| (id, doc)).collect())
    }

    #[instrument(skip(self, patch), fields(collection = %self.collection, room_id = %id))]
    async fn update(&self, id: &RoomId, patch: &RoomPatch) -> Result<RoomDocument, StoreError> {
        let mut documents = self.lock()?;
        let (_, doc) = documents
            .rooms
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(format!("Room {} not found", id)))?;
        doc.apply(patch);
        let committed = doc.clone();
        self.notifier.publish(id, &committed);
        debug!(status = %committed.status, turn = %committed.turn, "Room updated");
        Ok(committed)
    }

    #[instrument(skip(self), fields(collection = %self.collection, room_id = %id))]
    async fn subscribe(&self, id: &RoomId) -> Result<RoomSubscription, StoreError> {
        let documents = self.lock()?;
        let (_, doc) = documents
            .rooms
            .get(id)
            .ok_or_else(|| StoreError::not_found(format!("Room {} not found", id)))?;
        Ok(self.notifier.subscribe(id, doc.clone()))
    }
}
