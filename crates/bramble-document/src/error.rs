use serde::Serialize;
use thiserror::Error;

use bramble_types::ExternalId;

/// A single shape problem found while normalizing a document.
///
/// `location` is a JSON-path-like pointer (`waypoints[3].options[1]`) so an
/// author can find the record; `message` says what is wrong with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShapeIssue {
    pub location: String,
    pub message: String,
}

impl ShapeIssue {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Why a document was rejected.
///
/// All variants are authoring errors and recoverable: the upload is refused,
/// nothing is persisted, and the reason is reported back to the author.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(String),

    #[error("malformed document: {}", format_issues(.0))]
    Malformed(Vec<ShapeIssue>),

    #[error("duplicate waypoint id {0}")]
    DuplicateWaypointId(ExternalId),

    #[error("option on waypoint {source_waypoint} references undeclared waypoint id {destination}")]
    DanglingReference {
        source_waypoint: ExternalId,
        destination: ExternalId,
    },

    #[error("document declares no start waypoint")]
    MissingStartWaypoint,

    #[error("document declares {0} start waypoints, expected exactly one")]
    MultipleStartWaypoints(usize),
}

fn format_issues(issues: &[ShapeIssue]) -> String {
    let rendered: Vec<String> = issues.iter().map(ShapeIssue::to_string).collect();
    format!("{} issue(s): {}", issues.len(), rendered.join("; "))
}
