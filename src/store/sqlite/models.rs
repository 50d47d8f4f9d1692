//! Database models for stored rooms.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use std::str::FromStr;
use tracing::instrument;

use super::schema;
use crate::games::reversi::Color;
use crate::room::{RoomDocument, RoomId, RoomPatch, RoomStatus};
use crate::store::StoreError;

/// Room row as stored.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::rooms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RoomRow {
    id: i32,
    collection: String,
    board: String,
    num_people: i32,
    status: String,
    turn: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl RoomRow {
    /// Decodes the row into the document schema.
    ///
    /// # Errors
    ///
    /// Returns a corrupt-kind [`StoreError`] if any column fails to parse.
    #[instrument(skip(self), fields(room_id = self.id))]
    pub fn into_document(self) -> Result<(RoomId, RoomDocument), StoreError> {
        let board: Vec<u8> = serde_json::from_str(&self.board)?;
        let status = RoomStatus::from_str(&self.status)
            .map_err(|_| StoreError::corrupt(format!("Invalid status: '{}'", self.status)))?;
        let turn = Color::from_str(&self.turn)
            .map_err(|_| StoreError::corrupt(format!("Invalid turn: '{}'", self.turn)))?;
        let num_people = u8::try_from(self.num_people).map_err(|_| {
            StoreError::corrupt(format!("Invalid num_people: {}", self.num_people))
        })?;

        Ok((
            RoomId::new(self.id.to_string()),
            RoomDocument {
                board,
                num_people,
                status,
                turn,
            },
        ))
    }
}

/// Insertable room row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::rooms)]
pub struct NewRoomRow {
    collection: String,
    board: String,
    num_people: i32,
    status: String,
    turn: String,
}

impl NewRoomRow {
    /// Encodes a document for insertion into `collection`.
    pub fn from_document(collection: &str, doc: &RoomDocument) -> Result<Self, StoreError> {
        Ok(Self::new(
            collection.to_string(),
            serde_json::to_string(&doc.board)?,
            i32::from(doc.num_people),
            doc.status.to_string(),
            doc.turn.to_string(),
        ))
    }
}

/// Partial update. `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::rooms)]
pub struct RoomChangeset {
    board: Option<String>,
    num_people: Option<i32>,
    status: Option<String>,
    turn: Option<String>,
    updated_at: NaiveDateTime,
}

impl RoomChangeset {
    /// Encodes a patch, stamping `updated_at`.
    pub fn from_patch(patch: &RoomPatch) -> Result<Self, StoreError> {
        Ok(Self {
            board: patch.board.as_ref().map(serde_json::to_string).transpose()?,
            num_people: patch.num_people.map(i32::from),
            status: patch.status.map(|status| status.to_string()),
            turn: patch.turn.map(|turn| turn.to_string()),
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}
