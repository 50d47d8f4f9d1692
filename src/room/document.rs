//! Stored room document schema.
//!
//! A room is stored as a flat key/value document:
//!
//! | field        | stored as                                    |
//! |--------------|----------------------------------------------|
//! | `board`      | 64 integers, row-major, 0 empty 1 white 2 black |
//! | `num_people` | joined participant count                     |
//! | `status`     | `matching`, `playing` or `end`               |
//! | `turn`       | `white` or `black`                           |

use crate::games::reversi::{Board, Color};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Store-assigned opaque room identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Creates a room id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Room phase.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomStatus {
    /// Waiting for a second participant.
    Matching,
    /// Both seats taken; moves are accepted.
    Playing,
    /// Terminal. No transition leaves this state.
    End,
}

/// A room as held by the shared-state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDocument {
    /// Flattened board, row-major.
    pub board: Vec<u8>,
    /// Joined participant count.
    pub num_people: u8,
    /// Room phase.
    pub status: RoomStatus,
    /// Color to move.
    pub turn: Color,
}

impl RoomDocument {
    /// The document a fresh room is created with: one participant,
    /// opening board, white to move.
    #[instrument]
    pub fn new_matching() -> Self {
        Self {
            board: Board::new().flatten().to_vec(),
            num_people: 1,
            status: RoomStatus::Matching,
            turn: Color::White,
        }
    }

    /// Merges the fields present in `patch` into this document.
    pub fn apply(&mut self, patch: &RoomPatch) {
        if let Some(board) = &patch.board {
            self.board = board.clone();
        }
        if let Some(num_people) = patch.num_people {
            self.num_people = num_people;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(turn) = patch.turn {
            self.turn = turn;
        }
    }
}

impl Default for RoomDocument {
    fn default() -> Self {
        Self::new_matching()
    }
}

/// Partial-field update. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option, prefix = "with_")]
pub struct RoomPatch {
    /// Replacement board, row-major.
    pub board: Option<Vec<u8>>,
    /// Replacement participant count.
    pub num_people: Option<u8>,
    /// Replacement status.
    pub status: Option<RoomStatus>,
    /// Replacement turn.
    pub turn: Option<Color>,
}

impl RoomPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.board.is_none()
            && self.num_people.is_none()
            && self.status.is_none()
            && self.turn.is_none()
    }
}

/// Equality filter for store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFilter {
    /// Every room in the collection.
    All,
    /// Rooms whose `status` equals the given value.
    Status(RoomStatus),
}

impl RoomFilter {
    /// Returns true if the document passes the filter.
    pub fn matches(&self, doc: &RoomDocument) -> bool {
        match self {
            RoomFilter::All => true,
            RoomFilter::Status(status) => doc.status == *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_wire_names() {
        let json = serde_json::to_value(RoomDocument::new_matching()).unwrap();
        assert_eq!(json["status"], "matching");
        assert_eq!(json["turn"], "white");
        assert_eq!(json["num_people"], 1);
        assert_eq!(json["board"].as_array().map(Vec::len), Some(64));
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut doc = RoomDocument::new_matching();
        let before_board = doc.board.clone();
        doc.apply(&RoomPatch::new().with_turn(Color::Black));
        assert_eq!(doc.turn, Color::Black);
        assert_eq!(doc.board, before_board);
        assert_eq!(doc.num_people, 1);
        assert!(RoomPatch::new().is_empty());
    }

    #[test]
    fn test_status_filter() {
        let doc = RoomDocument::new_matching();
        assert!(RoomFilter::Status(RoomStatus::Matching).matches(&doc));
        assert!(!RoomFilter::Status(RoomStatus::Playing).matches(&doc));
        assert!(RoomFilter::All.matches(&doc));
    }
}
