use thiserror::Error;

use bramble_types::{BookId, WaypointId};

/// Errors produced by storage operations.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("unknown book {0}")]
    UnknownBook(BookId),

    #[error("unknown waypoint {0}")]
    UnknownWaypoint(WaypointId),

    #[error("waypoint {0} already has a content row")]
    ContentExists(WaypointId),

    #[error("waypoint {0} has no content row")]
    MissingContent(WaypointId),

    #[error(
        "choice endpoints span books: {source_waypoint} belongs to {source_book}, \
         {destination} belongs to {destination_book}"
    )]
    CrossBookChoice {
        source_waypoint: WaypointId,
        source_book: BookId,
        destination: WaypointId,
        destination_book: BookId,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
