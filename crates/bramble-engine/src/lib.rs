//! High-level Bramble API.
//!
//! [`Bookshelf`] ties the pieces together — document validation, the graph
//! loader, the storage backend, and the audio media store — into the API the
//! server and CLI embed. This is the main entry point for applications.

pub mod audio;
pub mod error;
pub mod shelf;
pub mod views;

pub use audio::{MediaStore, StoredAudio, sanitize_filename, ALLOWED_AUDIO_EXTENSIONS};
pub use error::{EngineError, EngineResult};
pub use shelf::Bookshelf;
pub use views::{AudioAttachment, BookEntry, WaypointView};

// Re-export key types
pub use bramble_document::{BookDocument, DocumentError};
pub use bramble_loader::{LoadError, LoadedBook};
pub use bramble_store::{Book, Choice, Content, InMemoryGraphStore, Waypoint};
pub use bramble_types::{BookId, ChoiceId, ContentId, ExternalId, OwnerId, WaypointId};
