use std::collections::HashMap;

use serde::Serialize;

use bramble_document::{BookDocument, DocumentError};
use bramble_store::{GraphTransaction, NewBook, NewChoice, NewContent, NewWaypoint};
use bramble_types::{BookId, ExternalId, OwnerId, WaypointId};

use crate::error::LoadError;

/// Summary of a successful load, reported back to the uploader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadedBook {
    pub book: BookId,
    pub name: String,
    pub waypoints: usize,
    pub choices: usize,
}

/// Materializes one validated document into one storage transaction.
///
/// A `Loader` is single-use: it holds the external-id → waypoint-id mapping
/// for exactly one load and is consumed by [`Loader::load`]. Concurrent
/// loads each build their own `Loader`, so mappings never interleave.
///
/// The phases run in strict dependency order — book, then waypoints (which
/// populate the mapping), then choices and contents (which read it) — and
/// the transaction commits once, after all four. Any failure drops the
/// transaction uncommitted, leaving no visible state.
pub struct Loader {
    owner: OwnerId,
    mapping: HashMap<ExternalId, WaypointId>,
}

impl Loader {
    /// A loader attributing the created book to `owner`.
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            mapping: HashMap::new(),
        }
    }

    /// Run all phases and commit.
    ///
    /// The document is expected to come from the validating constructors of
    /// [`BookDocument`]; even so, every reference is re-resolved through the
    /// mapping built in the waypoint phase, which is the single source of
    /// truth once materialization starts.
    pub fn load(
        mut self,
        document: &BookDocument,
        mut tx: Box<dyn GraphTransaction + '_>,
    ) -> Result<LoadedBook, LoadError> {
        let book = self.create_book(document, tx.as_mut())?;
        self.create_waypoints(document, book, tx.as_mut())?;
        let choices = self.create_choices(document, tx.as_mut())?;
        self.create_contents(document, tx.as_mut())?;
        tx.commit()?;

        let summary = LoadedBook {
            book,
            name: document.name.clone(),
            waypoints: document.waypoint_count(),
            choices,
        };
        tracing::info!(
            book = %summary.book,
            name = %summary.name,
            waypoints = summary.waypoints,
            choices = summary.choices,
            "book loaded"
        );
        Ok(summary)
    }

    fn create_book(
        &self,
        document: &BookDocument,
        tx: &mut dyn GraphTransaction,
    ) -> Result<BookId, LoadError> {
        let id = tx.insert_book(NewBook {
            name: document.name.clone(),
            description: document.description.clone(),
            owner: self.owner,
        })?;
        Ok(id)
    }

    fn create_waypoints(
        &mut self,
        document: &BookDocument,
        book: BookId,
        tx: &mut dyn GraphTransaction,
    ) -> Result<(), LoadError> {
        for wp in &document.waypoints {
            let id = tx.insert_waypoint(NewWaypoint {
                book,
                start: wp.start,
            })?;
            // Re-declaring an id would silently orphan the earlier waypoint's
            // edges; ambiguous authorship is rejected, not guessed at.
            if self.mapping.insert(wp.id.clone(), id).is_some() {
                return Err(DocumentError::DuplicateWaypointId(wp.id.clone()).into());
            }
        }
        Ok(())
    }

    fn create_choices(
        &self,
        document: &BookDocument,
        tx: &mut dyn GraphTransaction,
    ) -> Result<usize, LoadError> {
        let mut created = 0;
        for wp in &document.waypoints {
            let source = self.resolve(&wp.id)?;
            for option in &wp.options {
                let destination = self.resolve(&option.destination)?;
                tx.insert_choice(NewChoice {
                    source,
                    destination,
                    link_text: option.link_text.clone(),
                })?;
                created += 1;
            }
        }
        Ok(created)
    }

    fn create_contents(
        &self,
        document: &BookDocument,
        tx: &mut dyn GraphTransaction,
    ) -> Result<(), LoadError> {
        for wp in &document.waypoints {
            let waypoint = self.resolve(&wp.id)?;
            tx.insert_content(NewContent {
                waypoint,
                text: wp.content.narrative_text().map(str::to_owned),
            })?;
        }
        Ok(())
    }

    fn resolve(&self, external: &ExternalId) -> Result<WaypointId, LoadError> {
        self.mapping
            .get(external)
            .copied()
            .ok_or_else(|| LoadError::UnresolvedWaypointReference(external.clone()))
    }
}
