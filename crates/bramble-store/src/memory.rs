use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use bramble_types::{BookId, ChoiceId, ContentId, WaypointId};

use crate::entity::{
    Book, Choice, Content, NewBook, NewChoice, NewContent, NewWaypoint, Waypoint,
};
use crate::error::{StoreError, StoreResult};
use crate::traits::{GraphReader, GraphStore, GraphTransaction};

#[derive(Default)]
struct Tables {
    books: BTreeMap<BookId, Book>,
    waypoints: BTreeMap<WaypointId, Waypoint>,
    contents: BTreeMap<ContentId, Content>,
    content_by_waypoint: HashMap<WaypointId, ContentId>,
    choices: BTreeMap<ChoiceId, Choice>,
}

/// In-memory, map-backed graph store.
///
/// Intended for tests and embedding. Rows live behind a `RwLock`; id
/// sequences are atomic so concurrent transactions never hand out the same
/// id (gaps from rolled-back transactions are fine, exactly as with SQL
/// sequences). Iteration order of the id-keyed maps is assignment order,
/// which gives readers insertion-ordered listings for free.
pub struct InMemoryGraphStore {
    tables: RwLock<Tables>,
    next_book: AtomicU64,
    next_waypoint: AtomicU64,
    next_content: AtomicU64,
    next_choice: AtomicU64,
}

impl InMemoryGraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_book: AtomicU64::new(1),
            next_waypoint: AtomicU64::new(1),
            next_content: AtomicU64::new(1),
            next_choice: AtomicU64::new(1),
        }
    }

    /// Number of committed book rows.
    pub fn book_count(&self) -> usize {
        self.tables.read().expect("lock poisoned").books.len()
    }

    /// Number of committed waypoint rows.
    pub fn waypoint_count(&self) -> usize {
        self.tables.read().expect("lock poisoned").waypoints.len()
    }

    /// Number of committed content rows.
    pub fn content_count(&self) -> usize {
        self.tables.read().expect("lock poisoned").contents.len()
    }

    /// Number of committed choice rows.
    pub fn choice_count(&self) -> usize {
        self.tables.read().expect("lock poisoned").choices.len()
    }

    /// Returns `true` if no rows of any kind have been committed.
    pub fn is_empty(&self) -> bool {
        let tables = self.tables.read().expect("lock poisoned");
        tables.books.is_empty()
            && tables.waypoints.is_empty()
            && tables.contents.is_empty()
            && tables.choices.is_empty()
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryGraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryGraphStore")
            .field("books", &self.book_count())
            .field("waypoints", &self.waypoint_count())
            .field("contents", &self.content_count())
            .field("choices", &self.choice_count())
            .finish()
    }
}

impl GraphReader for InMemoryGraphStore {
    fn book(&self, id: BookId) -> StoreResult<Option<Book>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables.books.get(&id).cloned())
    }

    fn books(&self) -> StoreResult<Vec<Book>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables.books.values().cloned().collect())
    }

    fn waypoint(&self, id: WaypointId) -> StoreResult<Option<Waypoint>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables.waypoints.get(&id).copied())
    }

    fn waypoints_in_book(&self, book: BookId) -> StoreResult<Vec<Waypoint>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables
            .waypoints
            .values()
            .filter(|wp| wp.book == book)
            .copied()
            .collect())
    }

    fn start_waypoint(&self, book: BookId) -> StoreResult<Option<Waypoint>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables
            .waypoints
            .values()
            .find(|wp| wp.book == book && wp.start)
            .copied())
    }

    fn content_for(&self, waypoint: WaypointId) -> StoreResult<Option<Content>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables
            .content_by_waypoint
            .get(&waypoint)
            .and_then(|id| tables.contents.get(id))
            .cloned())
    }

    fn choices_from(&self, source: WaypointId) -> StoreResult<Vec<Choice>> {
        let tables = self.tables.read().expect("lock poisoned");
        Ok(tables
            .choices
            .values()
            .filter(|choice| choice.source == source)
            .cloned()
            .collect())
    }
}

impl GraphStore for InMemoryGraphStore {
    fn begin(&self) -> Box<dyn GraphTransaction + '_> {
        Box::new(MemoryTransaction {
            store: self,
            staged: Staged::default(),
        })
    }

    fn set_content_audio(
        &self,
        waypoint: WaypointId,
        audio_url: &str,
        audio_seconds: Option<f32>,
    ) -> StoreResult<Content> {
        let mut tables = self.tables.write().expect("lock poisoned");
        if !tables.waypoints.contains_key(&waypoint) {
            return Err(StoreError::UnknownWaypoint(waypoint));
        }
        let content_id = *tables
            .content_by_waypoint
            .get(&waypoint)
            .ok_or(StoreError::MissingContent(waypoint))?;
        let content = tables
            .contents
            .get_mut(&content_id)
            .ok_or(StoreError::MissingContent(waypoint))?;
        content.audio_url = Some(audio_url.to_string());
        content.audio_seconds = audio_seconds;
        Ok(content.clone())
    }
}

#[derive(Default)]
struct Staged {
    books: Vec<Book>,
    waypoints: BTreeMap<WaypointId, Waypoint>,
    contents: Vec<Content>,
    content_waypoints: HashSet<WaypointId>,
    choices: Vec<Choice>,
}

impl Staged {
    fn is_empty(&self) -> bool {
        self.books.is_empty()
            && self.waypoints.is_empty()
            && self.contents.is_empty()
            && self.choices.is_empty()
    }
}

/// Write transaction over [`InMemoryGraphStore`].
///
/// Rows are staged privately and flushed into the shared tables in one
/// write-lock critical section on commit. Dropping the transaction without
/// committing discards the staged rows.
pub struct MemoryTransaction<'a> {
    store: &'a InMemoryGraphStore,
    staged: Staged,
}

impl MemoryTransaction<'_> {
    fn resolve_waypoint(&self, id: WaypointId) -> StoreResult<Waypoint> {
        if let Some(wp) = self.staged.waypoints.get(&id) {
            return Ok(*wp);
        }
        self.store
            .waypoint(id)?
            .ok_or(StoreError::UnknownWaypoint(id))
    }

    fn book_exists(&self, id: BookId) -> StoreResult<bool> {
        if self.staged.books.iter().any(|book| book.id == id) {
            return Ok(true);
        }
        Ok(self.store.book(id)?.is_some())
    }
}

impl GraphTransaction for MemoryTransaction<'_> {
    fn insert_book(&mut self, row: NewBook) -> StoreResult<BookId> {
        let id = BookId::new(self.store.next_book.fetch_add(1, Ordering::Relaxed));
        self.staged.books.push(Book {
            id,
            name: row.name,
            description: row.description,
            owner: row.owner,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn insert_waypoint(&mut self, row: NewWaypoint) -> StoreResult<WaypointId> {
        if !self.book_exists(row.book)? {
            return Err(StoreError::UnknownBook(row.book));
        }
        let id = WaypointId::new(self.store.next_waypoint.fetch_add(1, Ordering::Relaxed));
        self.staged.waypoints.insert(
            id,
            Waypoint {
                id,
                book: row.book,
                start: row.start,
            },
        );
        Ok(id)
    }

    fn insert_choice(&mut self, row: NewChoice) -> StoreResult<ChoiceId> {
        let source = self.resolve_waypoint(row.source)?;
        let destination = self.resolve_waypoint(row.destination)?;
        if source.book != destination.book {
            return Err(StoreError::CrossBookChoice {
                source_waypoint: source.id,
                source_book: source.book,
                destination: destination.id,
                destination_book: destination.book,
            });
        }
        let id = ChoiceId::new(self.store.next_choice.fetch_add(1, Ordering::Relaxed));
        self.staged.choices.push(Choice {
            id,
            source: row.source,
            destination: row.destination,
            link_text: row.link_text,
        });
        Ok(id)
    }

    fn insert_content(&mut self, row: NewContent) -> StoreResult<ContentId> {
        self.resolve_waypoint(row.waypoint)?;
        if self.staged.content_waypoints.contains(&row.waypoint)
            || self.store.content_for(row.waypoint)?.is_some()
        {
            return Err(StoreError::ContentExists(row.waypoint));
        }
        let id = ContentId::new(self.store.next_content.fetch_add(1, Ordering::Relaxed));
        self.staged.content_waypoints.insert(row.waypoint);
        self.staged.contents.push(Content {
            id,
            waypoint: row.waypoint,
            text: row.text,
            audio_url: None,
            audio_seconds: None,
        });
        Ok(id)
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        let staged = std::mem::take(&mut self.staged);
        let mut tables = self.store.tables.write().expect("lock poisoned");
        for book in staged.books {
            tables.books.insert(book.id, book);
        }
        for (id, waypoint) in staged.waypoints {
            tables.waypoints.insert(id, waypoint);
        }
        for content in staged.contents {
            tables.content_by_waypoint.insert(content.waypoint, content.id);
            tables.contents.insert(content.id, content);
        }
        for choice in staged.choices {
            tables.choices.insert(choice.id, choice);
        }
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            tracing::debug!(
                books = self.staged.books.len(),
                waypoints = self.staged.waypoints.len(),
                "transaction dropped without commit; staged rows discarded"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use bramble_types::OwnerId;

    use super::*;

    fn new_book(name: &str) -> NewBook {
        NewBook {
            name: name.into(),
            description: format!("{name} description"),
            owner: OwnerId::generate(),
        }
    }

    /// Commit one book with `starts.len()` waypoints and return the ids.
    fn commit_book(store: &InMemoryGraphStore, starts: &[bool]) -> (BookId, Vec<WaypointId>) {
        let mut tx = store.begin();
        let book = tx.insert_book(new_book("fixture")).unwrap();
        let wps: Vec<WaypointId> = starts
            .iter()
            .map(|&start| tx.insert_waypoint(NewWaypoint { book, start }).unwrap())
            .collect();
        tx.commit().unwrap();
        (book, wps)
    }

    // -----------------------------------------------------------------------
    // Commit / rollback
    // -----------------------------------------------------------------------

    #[test]
    fn committed_rows_become_visible() {
        let store = InMemoryGraphStore::new();
        let mut tx = store.begin();
        let book = tx.insert_book(new_book("A")).unwrap();
        let wp = tx.insert_waypoint(NewWaypoint { book, start: true }).unwrap();
        tx.insert_content(NewContent {
            waypoint: wp,
            text: Some("hello".into()),
        })
        .unwrap();
        tx.commit().unwrap();

        assert_eq!(store.book(book).unwrap().unwrap().name, "A");
        assert_eq!(store.waypoint(wp).unwrap().unwrap().book, book);
        assert_eq!(
            store.content_for(wp).unwrap().unwrap().text.as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn nothing_is_visible_before_commit() {
        let store = InMemoryGraphStore::new();
        let mut tx = store.begin();
        let book = tx.insert_book(new_book("A")).unwrap();
        assert!(store.book(book).unwrap().is_none());
        assert!(store.is_empty());
        tx.commit().unwrap();
        assert!(!store.is_empty());
    }

    #[test]
    fn dropped_transaction_discards_everything() {
        let store = InMemoryGraphStore::new();
        {
            let mut tx = store.begin();
            let book = tx.insert_book(new_book("A")).unwrap();
            let wp = tx.insert_waypoint(NewWaypoint { book, start: true }).unwrap();
            tx.insert_content(NewContent {
                waypoint: wp,
                text: None,
            })
            .unwrap();
            // no commit
        }
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_assigned_before_commit_and_monotonic() {
        let store = InMemoryGraphStore::new();
        let mut tx = store.begin();
        let book = tx.insert_book(new_book("A")).unwrap();
        let wp1 = tx.insert_waypoint(NewWaypoint { book, start: true }).unwrap();
        let wp2 = tx.insert_waypoint(NewWaypoint { book, start: false }).unwrap();
        assert!(wp1 < wp2);
        tx.commit().unwrap();
    }

    #[test]
    fn rolled_back_ids_are_not_reused() {
        let store = InMemoryGraphStore::new();
        let first = {
            let mut tx = store.begin();
            tx.insert_book(new_book("dropped")).unwrap()
            // rolled back
        };
        let mut tx = store.begin();
        let second = tx.insert_book(new_book("kept")).unwrap();
        tx.commit().unwrap();
        assert!(second > first);
    }

    // -----------------------------------------------------------------------
    // Referential integrity
    // -----------------------------------------------------------------------

    #[test]
    fn waypoint_requires_existing_book() {
        let store = InMemoryGraphStore::new();
        let mut tx = store.begin();
        let err = tx
            .insert_waypoint(NewWaypoint {
                book: BookId::new(999),
                start: false,
            })
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownBook(BookId::new(999)));
    }

    #[test]
    fn choice_requires_existing_endpoints() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        let err = tx
            .insert_choice(NewChoice {
                source: wps[0],
                destination: WaypointId::new(999),
                link_text: "off the map".into(),
            })
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownWaypoint(WaypointId::new(999)));
    }

    #[test]
    fn choice_rejects_cross_book_endpoints() {
        let store = InMemoryGraphStore::new();
        let (book_a, wps_a) = commit_book(&store, &[true]);
        let (book_b, wps_b) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        let err = tx
            .insert_choice(NewChoice {
                source: wps_a[0],
                destination: wps_b[0],
                link_text: "smuggled".into(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::CrossBookChoice {
                source_waypoint: wps_a[0],
                source_book: book_a,
                destination: wps_b[0],
                destination_book: book_b,
            }
        );
    }

    #[test]
    fn self_loop_choice_is_valid() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        tx.insert_choice(NewChoice {
            source: wps[0],
            destination: wps[0],
            link_text: "stay".into(),
        })
        .unwrap();
        tx.commit().unwrap();
        assert_eq!(store.choices_from(wps[0]).unwrap().len(), 1);
    }

    #[test]
    fn choice_may_span_transactions_within_one_book() {
        let store = InMemoryGraphStore::new();
        let (book, wps) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        let late_wp = tx.insert_waypoint(NewWaypoint { book, start: false }).unwrap();
        tx.insert_choice(NewChoice {
            source: late_wp,
            destination: wps[0],
            link_text: "back to the start".into(),
        })
        .unwrap();
        tx.commit().unwrap();
        assert_eq!(store.choices_from(late_wp).unwrap().len(), 1);
    }

    #[test]
    fn content_is_one_to_one_within_a_transaction() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        tx.insert_content(NewContent {
            waypoint: wps[0],
            text: None,
        })
        .unwrap();
        let err = tx
            .insert_content(NewContent {
                waypoint: wps[0],
                text: Some("again".into()),
            })
            .unwrap_err();
        assert_eq!(err, StoreError::ContentExists(wps[0]));
    }

    #[test]
    fn content_is_one_to_one_across_transactions() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        tx.insert_content(NewContent {
            waypoint: wps[0],
            text: None,
        })
        .unwrap();
        tx.commit().unwrap();

        let mut tx = store.begin();
        let err = tx
            .insert_content(NewContent {
                waypoint: wps[0],
                text: None,
            })
            .unwrap_err();
        assert_eq!(err, StoreError::ContentExists(wps[0]));
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[test]
    fn start_waypoint_is_first_with_flag() {
        let store = InMemoryGraphStore::new();
        let (book, wps) = commit_book(&store, &[false, true, true]);
        let start = store.start_waypoint(book).unwrap().unwrap();
        assert_eq!(start.id, wps[1]);
    }

    #[test]
    fn start_waypoint_absent_is_none_not_error() {
        let store = InMemoryGraphStore::new();
        let (book, _) = commit_book(&store, &[false, false]);
        assert!(store.start_waypoint(book).unwrap().is_none());
    }

    #[test]
    fn listings_are_in_insertion_order() {
        let store = InMemoryGraphStore::new();
        let (book, wps) = commit_book(&store, &[true, false, false]);
        let listed: Vec<WaypointId> = store
            .waypoints_in_book(book)
            .unwrap()
            .iter()
            .map(|wp| wp.id)
            .collect();
        assert_eq!(listed, wps);

        let mut tx = store.begin();
        for label in ["first", "second", "third"] {
            tx.insert_choice(NewChoice {
                source: wps[0],
                destination: wps[1],
                link_text: label.into(),
            })
            .unwrap();
        }
        tx.commit().unwrap();
        let labels: Vec<String> = store
            .choices_from(wps[0])
            .unwrap()
            .into_iter()
            .map(|c| c.link_text)
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn books_listing_is_oldest_first() {
        let store = InMemoryGraphStore::new();
        for name in ["one", "two"] {
            let mut tx = store.begin();
            tx.insert_book(new_book(name)).unwrap();
            tx.commit().unwrap();
        }
        let names: Vec<String> = store.books().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn missing_rows_read_as_none() {
        let store = InMemoryGraphStore::new();
        assert!(store.book(BookId::new(1)).unwrap().is_none());
        assert!(store.waypoint(WaypointId::new(1)).unwrap().is_none());
        assert!(store.content_for(WaypointId::new(1)).unwrap().is_none());
        assert!(store.choices_from(WaypointId::new(1)).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Audio update
    // -----------------------------------------------------------------------

    #[test]
    fn set_content_audio_updates_only_the_target() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true, false]);
        let mut tx = store.begin();
        for wp in &wps {
            tx.insert_content(NewContent {
                waypoint: *wp,
                text: Some("t".into()),
            })
            .unwrap();
        }
        tx.commit().unwrap();

        let updated = store
            .set_content_audio(wps[0], "/audio/1/intro.mp3", Some(12.5))
            .unwrap();
        assert_eq!(updated.audio_url.as_deref(), Some("/audio/1/intro.mp3"));
        assert_eq!(updated.audio_seconds, Some(12.5));

        let untouched = store.content_for(wps[1]).unwrap().unwrap();
        assert!(untouched.audio_url.is_none());
        assert!(untouched.audio_seconds.is_none());
    }

    #[test]
    fn set_content_audio_is_idempotent_per_address() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true]);
        let mut tx = store.begin();
        tx.insert_content(NewContent {
            waypoint: wps[0],
            text: None,
        })
        .unwrap();
        tx.commit().unwrap();

        let first = store.set_content_audio(wps[0], "/audio/1/a.mp3", None).unwrap();
        let second = store.set_content_audio(wps[0], "/audio/1/a.mp3", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.content_count(), 1);
    }

    #[test]
    fn set_content_audio_unknown_waypoint() {
        let store = InMemoryGraphStore::new();
        let err = store
            .set_content_audio(WaypointId::new(7), "/audio/1/a.mp3", None)
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownWaypoint(WaypointId::new(7)));
    }

    #[test]
    fn set_content_audio_missing_content_row() {
        let store = InMemoryGraphStore::new();
        let (_, wps) = commit_book(&store, &[true]);
        let err = store
            .set_content_audio(wps[0], "/audio/1/a.mp3", None)
            .unwrap_err();
        assert_eq!(err, StoreError::MissingContent(wps[0]));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_transactions_commit_independently() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryGraphStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut tx = store.begin();
                    let book = tx.insert_book(NewBook {
                        name: format!("book {i}"),
                        description: "parallel".into(),
                        owner: OwnerId::generate(),
                    })
                    .unwrap();
                    let wp = tx.insert_waypoint(NewWaypoint { book, start: true }).unwrap();
                    tx.insert_content(NewContent {
                        waypoint: wp,
                        text: Some(format!("text {i}")),
                    })
                    .unwrap();
                    tx.commit().unwrap();
                    (book, wp)
                })
            })
            .collect();

        let mut book_ids = Vec::new();
        for handle in handles {
            let (book, wp) = handle.join().expect("thread should not panic");
            assert_eq!(store.waypoint(wp).unwrap().unwrap().book, book);
            book_ids.push(book);
        }
        book_ids.sort();
        book_ids.dedup();
        assert_eq!(book_ids.len(), 8);
        assert_eq!(store.book_count(), 8);
        assert_eq!(store.waypoint_count(), 8);
        assert_eq!(store.content_count(), 8);
    }

    // -----------------------------------------------------------------------
    // Debug
    // -----------------------------------------------------------------------

    #[test]
    fn debug_format() {
        let store = InMemoryGraphStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryGraphStore"));
        assert!(debug.contains("books"));
    }
}
