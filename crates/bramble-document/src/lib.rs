//! Book document model and validation.
//!
//! An uploaded book is a JSON document: book metadata plus an ordered list of
//! waypoint records, each carrying a document-scoped id, a start flag, one
//! content block, and zero or more options referencing other waypoint ids.
//! This crate turns untyped JSON into a [`BookDocument`] that the loader can
//! trust, or rejects it with every problem the author needs to fix.
//!
//! Validation happens in two passes:
//!
//! 1. **Shape** — required fields and field types, collecting an issue for
//!    every offending waypoint rather than stopping at the first.
//! 2. **Cross-reference** — duplicate waypoint ids, options pointing at
//!    undeclared ids, and the start-waypoint cardinality rule (exactly one).
//!
//! Unknown fields anywhere in the document are ignored, so future content
//! types and extensions do not require a schema change here.

pub mod error;
pub mod model;
pub mod parse;

pub use error::{DocumentError, ShapeIssue};
pub use model::{BookDocument, ContentRecord, OptionRecord, WaypointRecord};

/// Content type whose `data` field carries narrative text.
pub const CONTENT_TYPE_TEXT: &str = "text";
