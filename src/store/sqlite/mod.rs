//! SQLite-backed store (diesel).
//!
//! Every room of every collection lives in one `rooms` table keyed by
//! an autoincrement id. Diesel is synchronous, so each operation runs
//! on the blocking pool. Writes are serialized in-process and each
//! update is one immediate transaction; notifications reach
//! subscribers in the same process only.

mod models;
mod schema;

use super::{ChangeNotifier, RoomStore, RoomSubscription, StoreError};
use crate::room::{RoomDocument, RoomFilter, RoomId, RoomPatch};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use models::{NewRoomRow, RoomChangeset, RoomRow};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

/// Schema migrations applied by [`SqliteStore::open`].
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug)]
struct Inner {
    db_path: String,
    collection: String,
    write_lock: Mutex<()>,
    notifier: ChangeNotifier,
}

impl Inner {
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::unavailable(format!("Failed to connect to '{}': {}", self.db_path, e))
        })
    }

    fn write_guard(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::unavailable("Write lock poisoned"))
    }

    fn find(&self, conn: &mut SqliteConnection, key: i32) -> Result<Option<RoomRow>, StoreError> {
        Ok(schema::rooms::table
            .filter(schema::rooms::id.eq(key))
            .filter(schema::rooms::collection.eq(self.collection.as_str()))
            .select(RoomRow::as_select())
            .first(conn)
            .optional()?)
    }
}

/// Parses a room id into a row key. Ids this store never issued are
/// simply unknown.
fn row_key(id: &RoomId) -> Result<i32, StoreError> {
    id.as_str()
        .parse()
        .map_err(|_| StoreError::not_found(format!("Room {} not found", id)))
}

/// Room store persisted in a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    inner: Arc<Inner>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database and applies migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or migrated.
    #[instrument(
        skip(db_path, collection),
        fields(db_path = %db_path.as_ref(), collection = %collection.as_ref())
    )]
    pub fn open(
        db_path: impl AsRef<str>,
        collection: impl AsRef<str>,
    ) -> Result<Self, StoreError> {
        let inner = Inner {
            db_path: db_path.as_ref().to_string(),
            collection: collection.as_ref().to_string(),
            write_lock: Mutex::new(()),
            notifier: ChangeNotifier::new(),
        };

        let mut conn = inner.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::unavailable(format!("Migrations failed: {}", e)))?;
        info!(migrations = applied.len(), "SQLite room store ready");

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Inner) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner)).await?
    }
}

#[async_trait]
impl RoomStore for SqliteStore {
    fn collection(&self) -> &str {
        &self.inner.collection
    }

    #[instrument(skip(self, doc), fields(collection = %self.inner.collection))]
    async fn create(&self, doc: RoomDocument) -> Result<RoomId, StoreError> {
        self.blocking(move |inner| {
            let new_row = NewRoomRow::from_document(&inner.collection, &doc)?;
            let _guard = inner.write_guard()?;
            let mut conn = inner.connection()?;

            let row = diesel::insert_into(schema::rooms::table)
                .values(&new_row)
                .returning(RoomRow::as_returning())
                .get_result(&mut conn)?;

            let id = RoomId::new(row.id().to_string());
            info!(room_id = %id, "Room created");
            Ok(id)
        })
        .await
    }

    #[instrument(skip(self), fields(collection = %self.inner.collection))]
    async fn get(&self, id: &RoomId) -> Result<Option<RoomDocument>, StoreError> {
        let Ok(key) = row_key(id) else {
            return Ok(None);
        };
        self.blocking(move |inner| {
            let mut conn = inner.connection()?;
            match inner.find(&mut conn, key)? {
                Some(row) => Ok(Some(row.into_document()?.1)),
                None => {
                    debug!(key, "Room not found");
                    Ok(None)
                }
            }
        })
        .await
    }

    #[instrument(skip(self), fields(collection = %self.inner.collection))]
    async fn query(&self, filter: &RoomFilter) -> Result<Vec<(RoomId, RoomDocument)>, StoreError> {
        let filter = *filter;
        self.blocking(move |inner| {
            let mut conn = inner.connection()?;

            let mut query = schema::rooms::table
                .filter(schema::rooms::collection.eq(inner.collection.as_str()))
                .into_boxed();
            if let RoomFilter::Status(status) = filter {
                query = query.filter(schema::rooms::status.eq(status.to_string()));
            }

            let rows: Vec<RoomRow> = query
                .order(schema::rooms::id.asc())
                .select(RoomRow::as_select())
                .load(&mut conn)?;

            debug!(count = rows.len(), "Query complete");
            rows.into_iter().map(RoomRow::into_document).collect()
        })
        .await
    }

    #[instrument(skip(self, patch), fields(collection = %self.inner.collection, room_id = %id))]
    async fn update(&self, id: &RoomId, patch: &RoomPatch) -> Result<RoomDocument, StoreError> {
        let key = row_key(id)?;
        let changes = RoomChangeset::from_patch(patch)?;
        self.blocking(move |inner| {
            let _guard = inner.write_guard()?;
            let mut conn = inner.connection()?;

            let row = conn.immediate_transaction::<_, StoreError, _>(|conn| {
                let updated = diesel::update(
                    schema::rooms::table
                        .filter(schema::rooms::id.eq(key))
                        .filter(schema::rooms::collection.eq(inner.collection.as_str())),
                )
                .set(&changes)
                .execute(conn)?;

                if updated == 0 {
                    return Err(StoreError::not_found(format!("Room {} not found", key)));
                }
                inner
                    .find(conn, key)?
                    .ok_or_else(|| StoreError::not_found(format!("Room {} not found", key)))
            })?;

            let (id, doc) = row.into_document()?;
            inner.notifier.publish(&id, &doc);
            debug!(status = %doc.status, turn = %doc.turn, "Room updated");
            Ok(doc)
        })
        .await
    }

    #[instrument(skip(self), fields(collection = %self.inner.collection, room_id = %id))]
    async fn subscribe(&self, id: &RoomId) -> Result<RoomSubscription, StoreError> {
        let key = row_key(id)?;
        self.blocking(move |inner| {
            let _guard = inner.write_guard()?;
            let mut conn = inner.connection()?;
            let row = inner
                .find(&mut conn, key)?
                .ok_or_else(|| StoreError::not_found(format!("Room {} not found", key)))?;
            let (id, doc) = row.into_document()?;
            Ok(inner.notifier.subscribe(&id, doc))
        })
        .await
    }
}
