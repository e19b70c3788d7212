use bramble_types::{BookId, ChoiceId, ContentId, WaypointId};

use crate::entity::{
    Book, Choice, Content, NewBook, NewChoice, NewContent, NewWaypoint, Waypoint,
};
use crate::error::StoreResult;

/// Read-only access to the book graph.
///
/// All list-returning methods are ordered by id, which is insertion order —
/// choices come back in the order their document declared them.
pub trait GraphReader: Send + Sync {
    /// Fetch a book row. Returns `Ok(None)` if the id is unknown.
    fn book(&self, id: BookId) -> StoreResult<Option<Book>>;

    /// All books, oldest first.
    fn books(&self) -> StoreResult<Vec<Book>>;

    /// Fetch a waypoint row. Returns `Ok(None)` if the id is unknown.
    fn waypoint(&self, id: WaypointId) -> StoreResult<Option<Waypoint>>;

    /// All waypoints of a book, in insertion order.
    fn waypoints_in_book(&self, book: BookId) -> StoreResult<Vec<Waypoint>>;

    /// The book's entry point: the first waypoint row with `start = true`.
    ///
    /// `Ok(None)` means the book has no start waypoint — a data-integrity
    /// gap callers must surface as "absent", never as an error.
    fn start_waypoint(&self, book: BookId) -> StoreResult<Option<Waypoint>>;

    /// The content row of a waypoint.
    fn content_for(&self, waypoint: WaypointId) -> StoreResult<Option<Content>>;

    /// Outgoing choices of a waypoint, in insertion order.
    fn choices_from(&self, source: WaypointId) -> StoreResult<Vec<Choice>>;
}

/// A storage backend the loader can open transactions against.
///
/// Deletion is not part of the contract yet. When it is added, deleting a
/// book must cascade to its waypoints, their contents, and every choice
/// touching either endpoint; implementations should keep their schemas ready
/// for that.
pub trait GraphStore: GraphReader {
    /// Open a write transaction. Inserts assign ids immediately; nothing
    /// becomes visible to readers until `commit`.
    fn begin(&self) -> Box<dyn GraphTransaction + '_>;

    /// Update one waypoint's content row with an audio address and optional
    /// duration, touching no other row. Returns the updated content.
    fn set_content_audio(
        &self,
        waypoint: WaypointId,
        audio_url: &str,
        audio_seconds: Option<f32>,
    ) -> StoreResult<Content>;
}

/// One atomic unit of graph construction.
///
/// Implementations must satisfy these invariants:
/// - Inserts return storage-assigned ids immediately, before commit, so the
///   caller can wire up cross-references within the same transaction.
/// - `insert_waypoint` requires its book, and `insert_choice` and
///   `insert_content` require their waypoints, to exist either in this
///   transaction or committed.
/// - `insert_choice` rejects endpoints that resolve to different books.
/// - `insert_content` rejects a second content row for the same waypoint.
/// - Dropping the transaction without `commit` discards every staged row;
///   partial state is never visible to readers.
pub trait GraphTransaction {
    fn insert_book(&mut self, row: NewBook) -> StoreResult<BookId>;

    fn insert_waypoint(&mut self, row: NewWaypoint) -> StoreResult<WaypointId>;

    fn insert_choice(&mut self, row: NewChoice) -> StoreResult<ChoiceId>;

    fn insert_content(&mut self, row: NewContent) -> StoreResult<ContentId>;

    /// Publish every staged row atomically.
    fn commit(self: Box<Self>) -> StoreResult<()>;
}
