use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bramble_types::{BookId, ChoiceId, ContentId, OwnerId, WaypointId};

/// A book row. Names and descriptions are deliberately not unique: loading
/// the same document twice creates two independent books.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub description: String,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
}

/// A waypoint row: one narrative node, scoped to its book.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub book: BookId,
    /// Entry-point flag. The store carries whatever was inserted; the
    /// document layer guarantees one per book for loaded books.
    pub start: bool,
}

/// A content row, one-to-one with its waypoint.
///
/// `text` is null for non-text content. Audio fields are unset at load time
/// and populated by the audio-attachment operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub waypoint: WaypointId,
    pub text: Option<String>,
    pub audio_url: Option<String>,
    pub audio_seconds: Option<f32>,
}

/// A choice row: a labeled directed edge between two waypoints of the same
/// book. Self-edges are valid ("stay where you are").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub source: WaypointId,
    pub destination: WaypointId,
    pub link_text: String,
}

/// Insert payload for a book row.
#[derive(Clone, Debug)]
pub struct NewBook {
    pub name: String,
    pub description: String,
    pub owner: OwnerId,
}

/// Insert payload for a waypoint row.
#[derive(Clone, Copy, Debug)]
pub struct NewWaypoint {
    pub book: BookId,
    pub start: bool,
}

/// Insert payload for a content row.
#[derive(Clone, Debug)]
pub struct NewContent {
    pub waypoint: WaypointId,
    pub text: Option<String>,
}

/// Insert payload for a choice row.
#[derive(Clone, Debug)]
pub struct NewChoice {
    pub source: WaypointId,
    pub destination: WaypointId,
    pub link_text: String,
}
