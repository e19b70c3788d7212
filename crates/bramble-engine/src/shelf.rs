use serde_json::Value;

use bramble_document::BookDocument;
use bramble_loader::{LoadedBook, Loader};
use bramble_store::{Book, GraphReader, GraphStore, InMemoryGraphStore};
use bramble_types::{BookId, OwnerId, WaypointId};

use crate::audio::MediaStore;
use crate::error::{EngineError, EngineResult};
use crate::views::{AudioAttachment, BookEntry, WaypointView};

/// High-level Bramble API.
///
/// Owns the graph store and the audio media store, and exposes the four
/// operations the outer surfaces need: load a document, attach narration
/// audio, and the two navigation queries. Loads are independent — each one
/// runs in its own transaction with its own id mapping — so a `Bookshelf`
/// can be shared across request handlers.
pub struct Bookshelf {
    store: InMemoryGraphStore,
    media: MediaStore,
}

impl Bookshelf {
    /// A shelf over a fresh in-memory store.
    pub fn new(media: MediaStore) -> Self {
        Self::with_store(InMemoryGraphStore::new(), media)
    }

    /// A shelf over an existing store.
    pub fn with_store(store: InMemoryGraphStore, media: MediaStore) -> Self {
        Self { store, media }
    }

    // ---- Loading ----

    /// Load a validated document as a new book owned by `owner`.
    ///
    /// Never idempotent: each call creates a new book.
    pub fn load_document(
        &self,
        document: &BookDocument,
        owner: OwnerId,
    ) -> EngineResult<LoadedBook> {
        let summary = Loader::new(owner).load(document, self.store.begin())?;
        Ok(summary)
    }

    /// Validate and load an untyped JSON document.
    pub fn load_json_value(&self, value: &Value, owner: OwnerId) -> EngineResult<LoadedBook> {
        let document = BookDocument::from_json_value(value)?;
        self.load_document(&document, owner)
    }

    /// Parse, validate, and load raw upload bytes.
    pub fn load_bytes(&self, bytes: &[u8], owner: OwnerId) -> EngineResult<LoadedBook> {
        let document = BookDocument::from_slice(bytes)?;
        self.load_document(&document, owner)
    }

    // ---- Audio ----

    /// Store narration audio for one waypoint and record its address on that
    /// waypoint's content row. Touches nothing else. Re-uploading the same
    /// filename overwrites the file and lands on the same address.
    pub fn attach_audio(
        &self,
        waypoint: WaypointId,
        bytes: &[u8],
        filename: &str,
        seconds: Option<f32>,
    ) -> EngineResult<AudioAttachment> {
        let row = self
            .store
            .waypoint(waypoint)?
            .ok_or(EngineError::WaypointNotFound(waypoint))?;
        let stored = self.media.store_audio(row.book, filename, bytes)?;
        let content = self
            .store
            .set_content_audio(waypoint, &stored.url, seconds)?;
        tracing::info!(%waypoint, url = %stored.url, "narration attached");
        Ok(AudioAttachment {
            waypoint,
            audio_url: stored.url,
            audio_seconds: content.audio_seconds,
        })
    }

    // ---- Navigation ----

    /// The waypoint, its content, and its outgoing choices.
    pub fn waypoint_graph(&self, waypoint: WaypointId) -> EngineResult<WaypointView> {
        let row = self
            .store
            .waypoint(waypoint)?
            .ok_or(EngineError::WaypointNotFound(waypoint))?;
        let content = self.store.content_for(waypoint)?;
        let choices = self.store.choices_from(waypoint)?;
        Ok(WaypointView {
            waypoint: row,
            content,
            choices,
        })
    }

    /// The book and its start waypoint, if one exists.
    pub fn book_entry(&self, book: BookId) -> EngineResult<BookEntry> {
        let row = self
            .store
            .book(book)?
            .ok_or(EngineError::BookNotFound(book))?;
        let start = self.store.start_waypoint(book)?;
        Ok(BookEntry { book: row, start })
    }

    /// All books, oldest first.
    pub fn books(&self) -> EngineResult<Vec<Book>> {
        Ok(self.store.books()?)
    }

    // ---- Accessors ----

    pub fn store(&self) -> &InMemoryGraphStore {
        &self.store
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }
}

impl std::fmt::Debug for Bookshelf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bookshelf")
            .field("store", &self.store)
            .field("media", &self.media)
            .finish()
    }
}
