//! Shared-state store for room documents.
//!
//! The store is the only arbiter of write atomicity: every
//! [`RoomStore::update`] is a single partial-field merge, and
//! subscribers of a room see commits in the order they were made.
//! There is no versioning or conflict detection; the last write wins.

mod error;
mod memory;
mod notify;
mod sqlite;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryStore;
pub use notify::{ChangeNotifier, RoomSnapshot, RoomSubscription};
pub use sqlite::SqliteStore;

use crate::room::{RoomDocument, RoomFilter, RoomId, RoomPatch};
use async_trait::async_trait;
use std::sync::Arc;

/// Default collection rooms are stored in.
pub const DEFAULT_COLLECTION: &str = "random_rooms";

/// Store handle shared between sessions.
pub type SharedStore = Arc<dyn RoomStore>;

/// Key-value document store bound to one collection of rooms.
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug {
    /// Name of the collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Inserts a document and returns its new id.
    async fn create(&self, doc: RoomDocument) -> Result<RoomId, StoreError>;

    /// Reads a document. `Ok(None)` when the id is unknown.
    async fn get(&self, id: &RoomId) -> Result<Option<RoomDocument>, StoreError>;

    /// Lists documents passing `filter`, oldest first.
    async fn query(&self, filter: &RoomFilter) -> Result<Vec<(RoomId, RoomDocument)>, StoreError>;

    /// Merges `patch` into a document atomically and returns the result.
    ///
    /// # Errors
    ///
    /// [`StoreErrorKind::NotFound`] if the id is unknown.
    async fn update(&self, id: &RoomId, patch: &RoomPatch) -> Result<RoomDocument, StoreError>;

    /// Follows a document's commits, starting with its current state.
    ///
    /// # Errors
    ///
    /// [`StoreErrorKind::NotFound`] if the id is unknown.
    async fn subscribe(&self, id: &RoomId) -> Result<RoomSubscription, StoreError>;
}
