//! Rooms: the stored document and the match lifecycle.

mod document;
mod machine;

pub use document::{RoomDocument, RoomFilter, RoomId, RoomPatch, RoomStatus};
pub use machine::{Room, RoomError, Transition};
