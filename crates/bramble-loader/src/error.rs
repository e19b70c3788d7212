use thiserror::Error;

use bramble_document::DocumentError;
use bramble_store::StoreError;
use bramble_types::ExternalId;

/// Why a load failed.
///
/// Whatever the variant, a failed load leaves no persisted trace: the
/// transaction is dropped uncommitted.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    /// The document failed validation before any storage write.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A reference did not resolve through the load's id mapping. Validation
    /// rules this out for documents built by the constructors, but the
    /// mapping is the source of truth during materialization and is checked
    /// independently.
    #[error("waypoint reference {0} did not resolve during materialization")]
    UnresolvedWaypointReference(ExternalId),

    /// The storage layer refused a write or the final commit.
    #[error("storage rejected the load: {0}")]
    Store(#[from] StoreError),
}
