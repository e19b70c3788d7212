//! Book-graph materialization.
//!
//! The [`Loader`] walks a validated [`BookDocument`](bramble_document::BookDocument)
//! and creates the relational graph inside one storage transaction: the book
//! row, a waypoint row per declared waypoint, a choice row per declared
//! option, and a content row per waypoint, committed atomically at the end.
//!
//! The crux is the two-pass id remapping. Options may reference waypoints
//! declared later in the document, or form cycles (including self-loops), and
//! storage assigns ids only on insertion — so every waypoint must be inserted
//! and mapped before any choice can be resolved. The mapping lives for one
//! load only and is never shared between loads.

pub mod error;
pub mod loader;

pub use error::LoadError;
pub use loader::{LoadedBook, Loader};
