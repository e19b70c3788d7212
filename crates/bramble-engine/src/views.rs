use serde::Serialize;

use bramble_store::{Book, Choice, Content, Waypoint};
use bramble_types::WaypointId;

/// Everything a reader needs while standing at one waypoint: the node, its
/// content, and the outgoing choices in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaypointView {
    pub waypoint: Waypoint,
    /// Absent only if the content row is missing — an integrity gap the
    /// read path tolerates rather than failing navigation.
    pub content: Option<Content>,
    pub choices: Vec<Choice>,
}

/// A book and its entry point. `start` is absent when no waypoint carries
/// the start flag.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BookEntry {
    pub book: Book,
    pub start: Option<Waypoint>,
}

/// Result of attaching narration audio to a waypoint.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioAttachment {
    pub waypoint: WaypointId,
    /// Public address recorded on the content row.
    pub audio_url: String,
    pub audio_seconds: Option<f32>,
}
