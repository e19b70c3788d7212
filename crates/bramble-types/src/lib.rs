//! Foundation types for Bramble.
//!
//! This crate provides the identifier and identity types used throughout the
//! Bramble system. Every other Bramble crate depends on `bramble-types`.
//!
//! # Key Types
//!
//! - [`BookId`], [`WaypointId`], [`ContentId`], [`ChoiceId`] — storage-assigned
//!   record identifiers
//! - [`ExternalId`] — document-scoped waypoint identifier (integer or string)
//! - [`OwnerId`] — UUID v7 identity of the user a book is attributed to

pub mod error;
pub mod external;
pub mod ids;
pub mod owner;

pub use error::TypeError;
pub use external::ExternalId;
pub use ids::{BookId, ChoiceId, ContentId, WaypointId};
pub use owner::OwnerId;
