use thiserror::Error;

use bramble_document::DocumentError;
use bramble_loader::LoadError;
use bramble_store::StoreError;
use bramble_types::{BookId, WaypointId};

/// Errors surfaced by the [`Bookshelf`](crate::Bookshelf) API.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("book {0} not found")]
    BookNotFound(BookId),

    #[error("waypoint {0} not found")]
    WaypointNotFound(WaypointId),

    #[error("audio format not supported for {0} (allowed: mp3, ogg, wav)")]
    UnsupportedAudioFormat(String),

    #[error("filename {0:?} is empty after sanitization")]
    InvalidFilename(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("audio file write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
