//! In-process change notification for room documents.
//!
//! Each document gets one `watch` channel. Subscribers always observe
//! the latest committed snapshot; versions published faster than a
//! subscriber reads are coalesced. Every publish bumps a per-room
//! sequence number, so two commits that leave the document identical
//! are still told apart. The sequence lives in memory only.

use crate::room::{RoomDocument, RoomId};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, instrument, trace};

/// A committed document and its position in the room's commit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    /// Increases by one with every commit published for the room.
    pub seq: u64,
    /// The document as committed.
    pub document: RoomDocument,
}

/// Fans committed documents out to subscribers.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    channels: Mutex<HashMap<RoomId, watch::Sender<RoomSnapshot>>>,
}

impl ChangeNotifier {
    /// Creates a notifier with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a committed document.
    ///
    /// Callers publish while still holding their write lock so that
    /// subscribers see commits in order.
    #[instrument(level = "trace", skip(self, doc), fields(room_id = %id))]
    pub fn publish(&self, id: &RoomId, doc: &RoomDocument) {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        match channels.get(id) {
            Some(tx) => {
                tx.send_modify(|snapshot| {
                    snapshot.seq += 1;
                    snapshot.document = doc.clone();
                });
                trace!(receivers = tx.receiver_count(), "Published update");
            }
            None => {
                let (tx, _rx) = watch::channel(RoomSnapshot {
                    seq: 1,
                    document: doc.clone(),
                });
                channels.insert(id.clone(), tx);
            }
        }
    }

    /// Subscribes to a document, seeding the channel with `current` if
    /// nothing has been published for it yet.
    #[instrument(level = "debug", skip(self, current), fields(room_id = %id))]
    pub fn subscribe(&self, id: &RoomId, current: RoomDocument) -> RoomSubscription {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let rx = match channels.get(id) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = watch::channel(RoomSnapshot {
                    seq: 0,
                    document: current,
                });
                channels.insert(id.clone(), tx);
                rx
            }
        };
        debug!("Subscriber attached");
        RoomSubscription {
            room_id: id.clone(),
            rx,
            primed: false,
        }
    }
}

/// Push stream of one room's committed snapshots.
#[derive(Debug)]
pub struct RoomSubscription {
    room_id: RoomId,
    rx: watch::Receiver<RoomSnapshot>,
    primed: bool,
}

impl RoomSubscription {
    /// The room this subscription follows.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Waits for the next snapshot.
    ///
    /// The first call resolves immediately with the current state. Later
    /// calls resolve with the newest commit since the previous call.
    /// Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<RoomSnapshot> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
