//! Relational graph storage for Bramble.
//!
//! A book is one [`Book`] row, its narrative nodes are [`Waypoint`] rows,
//! each waypoint has exactly one [`Content`] row, and the labeled edges
//! between waypoints are [`Choice`] rows. Writers go through
//! [`GraphTransaction`] — inserts assign ids immediately, nothing is visible
//! until `commit`, and dropping an uncommitted transaction discards all of
//! it. Readers go through [`GraphReader`].
//!
//! [`InMemoryGraphStore`] is the reference backend, intended for tests and
//! embedding; a SQL backend would implement the same traits.

pub mod entity;
pub mod error;
pub mod memory;
pub mod traits;

pub use entity::{
    Book, Choice, Content, NewBook, NewChoice, NewContent, NewWaypoint, Waypoint,
};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryGraphStore;
pub use traits::{GraphReader, GraphStore, GraphTransaction};
