use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Identity of the user a book is attributed to.
///
/// Owners are minted and authenticated by a collaborator outside this system;
/// Bramble only carries the identity through to the book row. UUID v7 keeps
/// owner ids sortable by creation time, matching the rest of the id space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Mint a fresh owner identity.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// The anonymous owner (all-zero UUID). Used when no authenticated
    /// identity is available and anonymous uploads are permitted.
    pub const fn anonymous() -> Self {
        Self(Uuid::nil())
    }

    /// Returns `true` for the anonymous owner.
    pub fn is_anonymous(&self) -> bool {
        self.0.is_nil()
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for OwnerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.0)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OwnerId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TypeError::InvalidOwnerId(e.to_string()))
    }
}
